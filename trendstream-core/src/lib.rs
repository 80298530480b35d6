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

//! Trendstream Core
//!
//! Domain rules for the tweet ingestion service: post validation, content
//! digests for deduplication, and hashtag extraction. Everything in this
//! crate is pure and synchronous; I/O lives in `trendstream-server`.

pub mod digest;
pub mod error;
pub mod hashtag;
pub mod validate;

pub use digest::content_digest;
pub use error::ValidationError;
pub use hashtag::extract_hashtags;
pub use validate::{validate_count, validate_post, MAX_TRENDING_COUNT, MAX_TWEET_CHARS};
