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

//! Post-acknowledgment ingestion pipeline.
//!
//! Runs after the HTTP layer has already answered 202: digest the post,
//! check the dedup filter, extract hashtags, then update the filter and the
//! trending ranking concurrently. Failures here never reach the submitter;
//! the spawn site logs them.

use std::sync::Arc;

use trendstream_core::{content_digest, extract_hashtags};

use crate::store::{StoreError, TrendStore};

/// What processing one post amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The post was new; the filter was updated and, when hashtags were
    /// present, so was the ranking.
    Completed { hashtags: usize },
    /// The dedup filter already knew the digest; nothing was updated.
    Skipped,
}

/// Executes the ingestion steps for accepted posts.
#[derive(Clone)]
pub struct IngestPipeline {
    store: Arc<dyn TrendStore>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn TrendStore>) -> Self {
        Self { store }
    }

    /// Process one validated post through to completion.
    ///
    /// The membership check and the later filter insert are deliberately
    /// not atomic as a pair: two concurrent submissions of the same text
    /// can both pass the check and each bump the ranking.
    pub async fn process(&self, text: &str) -> Result<IngestOutcome, StoreError> {
        let digest = content_digest(text);

        if self.store.is_duplicate(&digest).await? {
            tracing::info!("Duplicate tweet detected ({}). Skipping processing.", &digest[..12]);
            return Ok(IngestOutcome::Skipped);
        }

        let hashtags = extract_hashtags(text);

        let (marked, recorded) = tokio::join!(self.store.mark_seen(&digest), async {
            if hashtags.is_empty() {
                Ok(())
            } else {
                self.store.record_hashtags(&hashtags).await
            }
        });
        marked?;
        recorded?;

        if hashtags.is_empty() {
            tracing::info!("Tweet {} contains no hashtags", &digest[..12]);
        } else {
            tracing::info!(
                "Processed tweet {} with hashtags: {}",
                &digest[..12],
                hashtags.join(", ")
            );
        }

        Ok(IngestOutcome::Completed {
            hashtags: hashtags.len(),
        })
    }
}
