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

//! Content digests used as deduplication keys.

use sha2::{Digest, Sha256};

/// Compute the dedup key for a post: the lowercase hex SHA-256 of the raw
/// text. No normalization is applied, so posts differing only in case or
/// whitespace produce distinct digests.
pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let a = content_digest("Loving the weather today #sunny");
        let b = content_digest("Loving the weather today #sunny");
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_is_64_hex_chars() {
        let digest = content_digest("hello");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(
            content_digest("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_digest_distinguishes_texts() {
        assert_ne!(content_digest("hello"), content_digest("hello "));
        assert_ne!(content_digest("Hello"), content_digest("hello"));
    }
}
