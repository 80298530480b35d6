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

//! HTTP surface: tweet submission, trending queries, health.

pub mod hashtags;
pub mod health;
pub mod tweets;

pub use hashtags::{list_trending, TopHashtagEntry};
pub use health::health_check;
pub use tweets::submit_tweet;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use trendstream_core::ValidationError;

use crate::pipeline::IngestPipeline;
use crate::store::TrendStore;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not Found")]
    NotFound,

    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            // The detail is logged at the failure site; callers get a
            // generic body.
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrendStore>,
    pub pipeline: IngestPipeline,
}

impl AppState {
    pub fn new(store: Arc<dyn TrendStore>) -> Self {
        Self {
            pipeline: IngestPipeline::new(store.clone()),
            store,
        }
    }
}

/// Create router for the public API endpoints
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tweets", post(submit_tweet))
        .route("/api/v1/hashtags", get(list_trending))
        .route("/health", get(health_check))
        .fallback(not_found)
}

/// Catch-all for unknown routes
async fn not_found() -> ApiError {
    ApiError::NotFound
}
