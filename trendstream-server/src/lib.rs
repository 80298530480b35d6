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

pub mod api;
pub mod config;
pub mod pipeline;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::{HttpServerConfig, ServerConfig};
use store::{RedisTrendStore, TrendStore};

/// Request bodies larger than this are rejected before deserialization.
/// Generous for a 280-character post, tight enough to shrug off junk.
const MAX_BODY_BYTES: usize = 10 * 1024;

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendstream_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Trendstream Server");

    // Validate configuration
    config.validate()?;
    let addr = config.socket_addr()?;

    // Connect to Redis and make sure both trend structures exist before
    // accepting any traffic.
    tracing::info!("Connecting to Redis at {}", config.redis.url);
    let store = RedisTrendStore::connect(&config.redis).await?;
    store.ensure_structures().await?;
    tracing::info!(
        "Trend structures ready (filter: '{}', ranking: '{}')",
        config.redis.dedup_filter_key,
        config.redis.trending_key
    );

    let store: Arc<dyn TrendStore> = Arc::new(store);
    let state = AppState::new(store);

    // Build application router
    let app = api::api_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&config.server)?)
        // Add tracing
        .layer(TraceLayer::new_for_http());

    // Run HTTP server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the CORS layer for the configured origin policy.
///
/// An empty origin list allows all origins (development mode); a non-empty
/// list is enforced as-is, and a malformed entry aborts startup.
fn cors_layer(config: &HttpServerConfig) -> Result<CorsLayer> {
    if !config.enable_cors {
        return Ok(CorsLayer::new());
    }

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.is_empty() {
        tracing::warn!(
            "CORS: Allowing all origins (development mode). Set cors_origins in production!"
        );
        return Ok(cors.allow_origin(Any));
    }

    tracing::info!("CORS: Allowing origins: {:?}", config.cors_origins);
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("invalid CORS origin: {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn http_config(origins: &[&str]) -> HttpServerConfig {
        HttpServerConfig {
            cors_origins: origins.iter().map(|origin| origin.to_string()).collect(),
            ..HttpServerConfig::default()
        }
    }

    async fn allow_origin_header(layer: CorsLayer, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get("access-control-allow-origin")
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_cors_enforces_configured_origins() {
        let layer = cors_layer(&http_config(&["https://trends.example"])).unwrap();

        assert_eq!(
            allow_origin_header(layer.clone(), "https://trends.example").await,
            Some("https://trends.example".to_string())
        );
        assert_eq!(
            allow_origin_header(layer, "https://elsewhere.example").await,
            None
        );
    }

    #[tokio::test]
    async fn test_cors_empty_origin_list_allows_all() {
        let layer = cors_layer(&http_config(&[])).unwrap();

        assert_eq!(
            allow_origin_header(layer, "https://anyone.example").await,
            Some("*".to_string())
        );
    }

    #[test]
    fn test_cors_rejects_malformed_origin() {
        let config = http_config(&["https://ok.example", "bad\norigin"]);
        assert!(cors_layer(&config).is_err());
    }

    #[test]
    fn test_cors_disabled_skips_origin_parsing() {
        let mut config = http_config(&["bad\norigin"]);
        config.enable_cors = false;
        assert!(cors_layer(&config).is_ok());
    }
}
