// Copyright 2025 Trendstream (https://github.com/trendstream)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use trendstream_core::validate_count;

use crate::api::{ApiError, AppState};

/// Query parameters for the trending listing
#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    /// Raw `count` value. Kept as a string so validation owns the parsing
    /// and its error messages.
    pub count: Option<String>,
}

/// One entry of the trending listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopHashtagEntry {
    pub hashtag: String,
    pub count: u64,
}

/// GET /api/v1/hashtags?count=N - Top trending hashtags
///
/// Returns at most N entries, highest count first. Fewer hashtags than
/// requested is not an error; the listing is simply shorter.
pub async fn list_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<Vec<TopHashtagEntry>>, ApiError> {
    let count = validate_count(params.count.as_deref())?;

    let ranked = state.store.list_with_counts().await.map_err(|e| {
        tracing::error!("Failed to read trending hashtags: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    let top: Vec<TopHashtagEntry> = ranked
        .into_iter()
        .take(count)
        .map(|(hashtag, count)| TopHashtagEntry { hashtag, count })
        .collect();

    tracing::debug!("Retrieved top {} hashtags", top.len());
    Ok(Json(top))
}
