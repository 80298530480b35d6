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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use trendstream_core::MAX_TRENDING_COUNT;

/// Trendstream Server Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:3000")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty = allow all, use specific origins in production)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Key of the Bloom filter holding already-seen content digests
    #[serde(default = "default_dedup_filter_key")]
    pub dedup_filter_key: String,

    /// Target false-positive rate for the dedup filter (0 < rate < 1)
    #[serde(default = "default_dedup_error_rate")]
    pub dedup_error_rate: f64,

    /// Expected number of distinct posts the dedup filter is sized for
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: u64,

    /// Key of the Top-K structure ranking hashtag frequencies
    #[serde(default = "default_trending_key")]
    pub trending_key: String,

    /// Number of hashtags the ranking keeps. Must be at least the query
    /// ceiling so a maximal trending query can be answered.
    #[serde(default = "default_trending_k")]
    pub trending_k: usize,
}

// Default values
fn default_http_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_dedup_filter_key() -> String {
    "tweet_filter".to_string()
}

fn default_dedup_error_rate() -> f64 {
    0.01
}

fn default_dedup_capacity() -> u64 {
    1_000_000
}

fn default_trending_key() -> String {
    "topk_hashtags".to_string()
}

fn default_trending_k() -> usize {
    MAX_TRENDING_COUNT
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
            cors_origins: vec![], // Empty = allow all (development mode)
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            dedup_filter_key: default_dedup_filter_key(),
            dedup_error_rate: default_dedup_error_rate(),
            dedup_capacity: default_dedup_capacity(),
            trending_key: default_trending_key(),
            trending_k: default_trending_k(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            redis: RedisConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - TRENDSTREAM_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:3000)
    /// - TRENDSTREAM_ENABLE_CORS: Enable CORS (default: true)
    /// - TRENDSTREAM_REDIS_URL: Redis connection URL (default: redis://localhost:6379)
    /// - TRENDSTREAM_DEDUP_FILTER_KEY: Dedup filter key (default: tweet_filter)
    /// - TRENDSTREAM_DEDUP_ERROR_RATE: Dedup filter false-positive rate (default: 0.01)
    /// - TRENDSTREAM_DEDUP_CAPACITY: Dedup filter capacity (default: 1000000)
    /// - TRENDSTREAM_TRENDING_KEY: Top-K ranking key (default: topk_hashtags)
    /// - TRENDSTREAM_TRENDING_K: Top-K ranking width (default: 25)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server configuration
        if let Ok(addr) = std::env::var("TRENDSTREAM_HTTP_ADDR") {
            config.server.listen_addr = addr;
        }

        if let Ok(cors) = std::env::var("TRENDSTREAM_ENABLE_CORS") {
            config.server.enable_cors = cors.parse().unwrap_or(true);
        }

        // Redis configuration
        if let Ok(url) = std::env::var("TRENDSTREAM_REDIS_URL") {
            config.redis.url = url;
        }

        if let Ok(key) = std::env::var("TRENDSTREAM_DEDUP_FILTER_KEY") {
            config.redis.dedup_filter_key = key;
        }

        if let Ok(rate) = std::env::var("TRENDSTREAM_DEDUP_ERROR_RATE") {
            if let Ok(val) = rate.parse() {
                config.redis.dedup_error_rate = val;
            }
        }

        if let Ok(capacity) = std::env::var("TRENDSTREAM_DEDUP_CAPACITY") {
            if let Ok(val) = capacity.parse() {
                config.redis.dedup_capacity = val;
            }
        }

        if let Ok(key) = std::env::var("TRENDSTREAM_TRENDING_KEY") {
            config.redis.trending_key = key;
        }

        if let Ok(k) = std::env::var("TRENDSTREAM_TRENDING_K") {
            if let Ok(val) = k.parse() {
                config.redis.trending_k = val;
            }
        }

        config
    }

    /// Load configuration with priority: file > env > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        // Override with environment variables
        config = Self::merge_with_env(config);

        Ok(config)
    }

    /// Merge config with environment variables (env takes priority)
    fn merge_with_env(mut config: Self) -> Self {
        let env_config = Self::from_env();

        // Only override if env var was explicitly set
        if std::env::var("TRENDSTREAM_HTTP_ADDR").is_ok() {
            config.server.listen_addr = env_config.server.listen_addr;
        }
        if std::env::var("TRENDSTREAM_ENABLE_CORS").is_ok() {
            config.server.enable_cors = env_config.server.enable_cors;
        }
        if std::env::var("TRENDSTREAM_REDIS_URL").is_ok() {
            config.redis.url = env_config.redis.url;
        }
        if std::env::var("TRENDSTREAM_DEDUP_FILTER_KEY").is_ok() {
            config.redis.dedup_filter_key = env_config.redis.dedup_filter_key;
        }
        if std::env::var("TRENDSTREAM_DEDUP_ERROR_RATE").is_ok() {
            config.redis.dedup_error_rate = env_config.redis.dedup_error_rate;
        }
        if std::env::var("TRENDSTREAM_DEDUP_CAPACITY").is_ok() {
            config.redis.dedup_capacity = env_config.redis.dedup_capacity;
        }
        if std::env::var("TRENDSTREAM_TRENDING_KEY").is_ok() {
            config.redis.trending_key = env_config.redis.trending_key;
        }
        if std::env::var("TRENDSTREAM_TRENDING_K").is_ok() {
            config.redis.trending_k = env_config.redis.trending_k;
        }

        config
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate socket address
        self.socket_addr()?;

        if self.redis.url.is_empty() {
            anyhow::bail!("Redis URL must not be empty");
        }

        if self.redis.dedup_filter_key.is_empty() || self.redis.trending_key.is_empty() {
            anyhow::bail!("Redis structure keys must not be empty");
        }

        if !(self.redis.dedup_error_rate > 0.0 && self.redis.dedup_error_rate < 1.0) {
            anyhow::bail!(
                "Dedup filter error rate must be between 0 and 1, got {}",
                self.redis.dedup_error_rate
            );
        }

        if self.redis.dedup_capacity == 0 {
            anyhow::bail!("Dedup filter capacity must be positive");
        }

        if self.redis.trending_k < MAX_TRENDING_COUNT {
            anyhow::bail!(
                "Trending ranking width {} is smaller than the query ceiling {}",
                self.redis.trending_k,
                MAX_TRENDING_COUNT
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert_eq!(config.redis.dedup_filter_key, "tweet_filter");
        assert_eq!(config.redis.trending_key, "topk_hashtags");
        assert_eq!(config.redis.trending_k, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("TRENDSTREAM_HTTP_ADDR", "0.0.0.0:8080");
        std::env::set_var("TRENDSTREAM_TRENDING_K", "100");

        let config = ServerConfig::from_env();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.redis.trending_k, 100);

        std::env::remove_var("TRENDSTREAM_HTTP_ADDR");
        std::env::remove_var("TRENDSTREAM_TRENDING_K");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
listen_addr = "127.0.0.1:4000"

[redis]
url = "redis://cache.internal:6379"
dedup_capacity = 500000
"#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:4000");
        assert_eq!(config.redis.url, "redis://cache.internal:6379");
        assert_eq!(config.redis.dedup_capacity, 500_000);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.redis.dedup_filter_key, "tweet_filter");
        assert_eq!(config.redis.trending_k, 25);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.server.listen_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.redis.dedup_error_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.redis.dedup_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.redis.trending_k = 10;
        assert!(config.validate().is_err());
    }
}
