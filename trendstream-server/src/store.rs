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

//! Trend store: the two external structures behind ingestion.
//!
//! The service keeps its state in a pair of named probabilistic structures:
//! an approximate membership filter over content digests (deduplication) and
//! a top-k frequency ranking over hashtags (trending). [`TrendStore`] is the
//! narrow contract the rest of the server codes against; [`RedisTrendStore`]
//! binds it to the RedisBloom `BF.*` / `TOPK.*` commands over a shared
//! multiplexed connection, and [`MemoryTrendStore`] is an exact in-memory
//! stand-in for tests and redis-less runs.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{ErrorKind, RedisError, ServerErrorKind};

use crate::config::RedisConfig;

/// Failures talking to the trend store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis command failed: {0}")]
    Redis(#[from] RedisError),

    #[error("unexpected reply from trend store: {0}")]
    UnexpectedReply(String),
}

/// Contract for the dedup filter and the trending ranking.
///
/// The filter may report false positives but never false negatives for
/// digests actually inserted; inserting a digest twice is observably the
/// same as inserting it once. The ranking keeps approximate counts for the
/// most frequent hashtags only.
#[async_trait]
pub trait TrendStore: Send + Sync {
    /// Create both structures if they do not exist yet. Idempotent:
    /// running against already-present structures succeeds without
    /// touching their contents.
    async fn ensure_structures(&self) -> Result<(), StoreError>;

    /// Membership check for a content digest.
    async fn is_duplicate(&self, digest: &str) -> Result<bool, StoreError>;

    /// Insert a content digest into the dedup filter.
    async fn mark_seen(&self, digest: &str) -> Result<(), StoreError>;

    /// Submit one batch of hashtag occurrences to the ranking in a single
    /// call. Callers must not pass an empty batch; a hashtag appearing
    /// twice in the batch counts twice.
    async fn record_hashtags(&self, hashtags: &[String]) -> Result<(), StoreError>;

    /// Full ranked listing, highest count first.
    async fn list_with_counts(&self) -> Result<Vec<(String, u64)>, StoreError>;
}

/// Trend store backed by the RedisBloom and Top-K modules.
///
/// Holds one [`ConnectionManager`]; clones of it share the underlying
/// multiplexed connection, so every command issued here goes over the
/// single handle established at startup.
#[derive(Clone)]
pub struct RedisTrendStore {
    conn: ConnectionManager,
    filter_key: String,
    filter_error_rate: f64,
    filter_capacity: u64,
    topk_key: String,
    topk_k: usize,
}

impl RedisTrendStore {
    /// Connect to Redis and build a store bound to the configured keys.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.url.as_str())?;
        let conn = client.get_connection_manager().await?;

        Ok(Self {
            conn,
            filter_key: config.dedup_filter_key.clone(),
            filter_error_rate: config.dedup_error_rate,
            filter_capacity: config.dedup_capacity,
            topk_key: config.trending_key.clone(),
            topk_k: config.trending_k,
        })
    }
}

#[async_trait]
impl TrendStore for RedisTrendStore {
    async fn ensure_structures(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        let reserved: Result<(), RedisError> = redis::cmd("BF.RESERVE")
            .arg(&self.filter_key)
            .arg(self.filter_error_rate)
            .arg(self.filter_capacity)
            .query_async(&mut conn)
            .await;
        match reserved {
            Ok(()) => tracing::info!("Created dedup filter '{}'", self.filter_key),
            Err(e) if is_already_exists(&e) => {
                tracing::debug!("Dedup filter '{}' already exists", self.filter_key);
            }
            Err(e) => return Err(e.into()),
        }

        let reserved: Result<(), RedisError> = redis::cmd("TOPK.RESERVE")
            .arg(&self.topk_key)
            .arg(self.topk_k)
            .query_async(&mut conn)
            .await;
        match reserved {
            Ok(()) => tracing::info!(
                "Created trending ranking '{}' (k = {})",
                self.topk_key,
                self.topk_k
            ),
            Err(e) if is_already_exists(&e) => {
                tracing::debug!("Trending ranking '{}' already exists", self.topk_key);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    async fn is_duplicate(&self, digest: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let exists: bool = redis::cmd("BF.EXISTS")
            .arg(&self.filter_key)
            .arg(digest)
            .query_async(&mut conn)
            .await?;
        Ok(exists)
    }

    async fn mark_seen(&self, digest: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        // BF.ADD reports whether the digest was new; duplicates are fine.
        let _newly_added: bool = redis::cmd("BF.ADD")
            .arg(&self.filter_key)
            .arg(digest)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn record_hashtags(&self, hashtags: &[String]) -> Result<(), StoreError> {
        if hashtags.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        // TOPK.ADD returns, per added item, the entry it expelled (or nil).
        let dropped: Vec<Option<String>> = redis::cmd("TOPK.ADD")
            .arg(&self.topk_key)
            .arg(hashtags)
            .query_async(&mut conn)
            .await?;

        let expelled: Vec<String> = dropped.into_iter().flatten().collect();
        if !expelled.is_empty() {
            tracing::debug!("Hashtags fell out of the trending ranking: {:?}", expelled);
        }

        Ok(())
    }

    async fn list_with_counts(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Vec<redis::Value> = redis::cmd("TOPK.LIST")
            .arg(&self.topk_key)
            .arg("WITHCOUNT")
            .query_async(&mut conn)
            .await?;
        parse_topk_list(&raw)
    }
}

/// Classify a server reply as the "structure already exists" condition.
///
/// RedisBloom answers a repeated `BF.RESERVE` with `ERR item exists` and the
/// Top-K module answers a repeated `TOPK.RESERVE` with `TopK: key already
/// exists`. Neither carries a dedicated error code, so after narrowing on
/// the structured error kind the message text is the only discriminator
/// left; that check lives here and nowhere else.
fn is_already_exists(err: &RedisError) -> bool {
    match err.kind() {
        ErrorKind::Server(ServerErrorKind::ResponseError) | ErrorKind::Extension => {}
        _ => return false,
    }

    err.detail().map_or(false, |detail| detail.contains("exists"))
}

/// Parse a flat `TOPK.LIST <key> WITHCOUNT` reply: item, count, item, count.
fn parse_topk_list(values: &[redis::Value]) -> Result<Vec<(String, u64)>, StoreError> {
    if values.len() % 2 != 0 {
        return Err(StoreError::UnexpectedReply(format!(
            "ranking listing has an odd number of entries ({})",
            values.len()
        )));
    }

    let mut ranked = Vec::with_capacity(values.len() / 2);
    for pair in values.chunks_exact(2) {
        let hashtag = match &pair[0] {
            redis::Value::BulkString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            redis::Value::SimpleString(s) => s.clone(),
            other => {
                return Err(StoreError::UnexpectedReply(format!(
                    "non-string ranking entry: {other:?}"
                )))
            }
        };
        let count = match &pair[1] {
            redis::Value::Int(n) if *n >= 0 => *n as u64,
            other => {
                return Err(StoreError::UnexpectedReply(format!(
                    "non-integer count for '{hashtag}': {other:?}"
                )))
            }
        };
        ranked.push((hashtag, count));
    }

    Ok(ranked)
}

/// In-memory trend store for tests and redis-less runs.
///
/// Exact where the real structures are approximate: membership never
/// reports a false positive and counts are precise. Contents grow without
/// bound and are not persisted.
#[derive(Debug)]
pub struct MemoryTrendStore {
    inner: Mutex<MemoryInner>,
    k: usize,
}

#[derive(Debug, Default)]
struct MemoryInner {
    seen: HashSet<String>,
    counts: HashMap<String, u64>,
}

impl MemoryTrendStore {
    /// Create an empty store keeping the top `k` hashtags.
    pub fn new(k: usize) -> Self {
        Self {
            inner: Mutex::new(MemoryInner::default()),
            k,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means another holder panicked; the maps
        // inside are still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TrendStore for MemoryTrendStore {
    async fn ensure_structures(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn is_duplicate(&self, digest: &str) -> Result<bool, StoreError> {
        Ok(self.lock().seen.contains(digest))
    }

    async fn mark_seen(&self, digest: &str) -> Result<(), StoreError> {
        self.lock().seen.insert(digest.to_string());
        Ok(())
    }

    async fn record_hashtags(&self, hashtags: &[String]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        for hashtag in hashtags {
            *inner.counts.entry(hashtag.clone()).or_insert(0) += 1;
        }
        Ok(())
    }

    async fn list_with_counts(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let inner = self.lock();
        let mut ranked: Vec<(String, u64)> = inner
            .counts
            .iter()
            .map(|(hashtag, count)| (hashtag.clone(), *count))
            .collect();
        // Ties break alphabetically so listings are stable.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.k);
        Ok(ranked)
    }
}
