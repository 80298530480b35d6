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

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use trendstream_core::validate_post;

use crate::api::{ApiError, AppState};

/// Tweet submission payload
#[derive(Debug, Deserialize)]
pub struct SubmitTweetRequest {
    /// The post text. Optional so an absent field reaches validation
    /// instead of being rejected during deserialization.
    pub tweet: Option<String>,
}

/// Acknowledgment returned to the submitter
#[derive(Debug, Serialize)]
pub struct SubmitTweetResponse {
    pub message: String,
}

/// POST /api/v1/tweets - Accept a tweet for ingestion
///
/// Validation runs synchronously; everything after the 202 (digest, dedup,
/// ranking update) happens on a spawned task whose failures go to the log,
/// never back to the submitter.
pub async fn submit_tweet(
    State(state): State<AppState>,
    Json(request): Json<SubmitTweetRequest>,
) -> Result<(StatusCode, Json<SubmitTweetResponse>), ApiError> {
    validate_post(request.tweet.as_deref()).map_err(|e| {
        tracing::warn!("Rejected tweet submission: {}", e);
        e
    })?;

    let text = request.tweet.unwrap_or_default();
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        if let Err(e) = pipeline.process(&text).await {
            tracing::error!("Tweet processing failed: {}", e);
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitTweetResponse {
            message: "Tweet received for processing.".to_string(),
        }),
    ))
}
