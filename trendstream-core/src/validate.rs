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

//! Input validation for submitted posts and trending queries.
//!
//! Runs synchronously before anything is acknowledged; a post that fails
//! here never reaches the ingestion pipeline.

use std::num::IntErrorKind;

use crate::error::ValidationError;

/// Maximum accepted post length, counted in characters.
pub const MAX_TWEET_CHARS: usize = 280;

/// Upper bound for the trending-query `count` parameter. Kept in line with
/// the width the ranking structure is reserved with, so a maximal query can
/// always be answered from one listing.
pub const MAX_TRENDING_COUNT: usize = 25;

/// Validate the text of a submitted post.
///
/// `None` and `Some("")` are both treated as an absent field. Whitespace
/// around the text is tolerated for the emptiness check only; the text
/// itself is never modified.
pub fn validate_post(text: Option<&str>) -> Result<(), ValidationError> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ValidationError::MissingContent),
    };

    if text.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    if text.chars().count() > MAX_TWEET_CHARS {
        return Err(ValidationError::TooLong {
            max: MAX_TWEET_CHARS,
        });
    }

    Ok(())
}

/// Validate the raw `count` query parameter and return the parsed value.
///
/// The parameter must be present and parse in full as a positive decimal
/// integer no larger than [`MAX_TRENDING_COUNT`]. A value too large to
/// represent is reported against the ceiling, not as a parse failure.
pub fn validate_count(raw: Option<&str>) -> Result<usize, ValidationError> {
    let raw = raw.ok_or(ValidationError::MissingParameter)?;

    let count: usize = match raw.trim().parse() {
        Ok(count) => count,
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => {
            return Err(ValidationError::ExceedsMaximum {
                max: MAX_TRENDING_COUNT,
            })
        }
        Err(_) => return Err(ValidationError::NotAPositiveInteger),
    };

    if count == 0 {
        return Err(ValidationError::NotAPositiveInteger);
    }

    if count > MAX_TRENDING_COUNT {
        return Err(ValidationError::ExceedsMaximum {
            max: MAX_TRENDING_COUNT,
        });
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_post_accepts_ordinary_text() {
        assert!(validate_post(Some("Shipping the new release today #rustlang")).is_ok());
    }

    #[test]
    fn test_validate_post_missing_field() {
        assert_eq!(validate_post(None), Err(ValidationError::MissingContent));
        assert_eq!(
            validate_post(Some("")),
            Err(ValidationError::MissingContent)
        );
    }

    #[test]
    fn test_validate_post_whitespace_only() {
        assert_eq!(
            validate_post(Some("   \t\n")),
            Err(ValidationError::EmptyContent)
        );
    }

    #[test]
    fn test_validate_post_length_boundary() {
        let at_limit = "x".repeat(MAX_TWEET_CHARS);
        assert!(validate_post(Some(&at_limit)).is_ok());

        let over_limit = "x".repeat(MAX_TWEET_CHARS + 1);
        assert_eq!(
            validate_post(Some(&over_limit)),
            Err(ValidationError::TooLong {
                max: MAX_TWEET_CHARS
            })
        );
    }

    #[test]
    fn test_validate_post_counts_characters_not_bytes() {
        // 280 multibyte characters is still within the cap.
        let multibyte = "é".repeat(MAX_TWEET_CHARS);
        assert!(multibyte.len() > MAX_TWEET_CHARS);
        assert!(validate_post(Some(&multibyte)).is_ok());
    }

    #[test]
    fn test_validate_count_accepts_range() {
        assert_eq!(validate_count(Some("1")), Ok(1));
        assert_eq!(validate_count(Some("10")), Ok(10));
        assert_eq!(
            validate_count(Some(&MAX_TRENDING_COUNT.to_string())),
            Ok(MAX_TRENDING_COUNT)
        );
    }

    #[test]
    fn test_validate_count_missing() {
        assert_eq!(validate_count(None), Err(ValidationError::MissingParameter));
    }

    #[test]
    fn test_validate_count_rejects_non_integers() {
        for raw in ["abc", "", "3.5", "-1", "0", "5abc", "1e2"] {
            assert_eq!(
                validate_count(Some(raw)),
                Err(ValidationError::NotAPositiveInteger),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn test_validate_count_over_ceiling() {
        assert_eq!(
            validate_count(Some("26")),
            Err(ValidationError::ExceedsMaximum {
                max: MAX_TRENDING_COUNT
            })
        );
        assert_eq!(
            validate_count(Some("1000")),
            Err(ValidationError::ExceedsMaximum {
                max: MAX_TRENDING_COUNT
            })
        );
    }

    #[test]
    fn test_validate_count_overflow_reports_ceiling() {
        // Far beyond what usize can hold, but still a positive integer.
        assert_eq!(
            validate_count(Some("99999999999999999999999")),
            Err(ValidationError::ExceedsMaximum {
                max: MAX_TRENDING_COUNT
            })
        );
        assert_eq!(
            validate_count(Some("-99999999999999999999999")),
            Err(ValidationError::NotAPositiveInteger)
        );
    }

    #[test]
    fn test_validate_count_tolerates_surrounding_whitespace() {
        assert_eq!(validate_count(Some(" 5 ")), Ok(5));
    }

    #[test]
    fn test_error_messages_are_client_facing() {
        assert_eq!(
            validate_post(None).unwrap_err().to_string(),
            "Tweet is required."
        );
        assert_eq!(
            validate_post(Some(" ")).unwrap_err().to_string(),
            "Tweet must be a non-empty string."
        );
        assert_eq!(
            validate_post(Some(&"x".repeat(281))).unwrap_err().to_string(),
            "Tweet exceeds maximum length of 280 characters."
        );
        assert_eq!(
            validate_count(None).unwrap_err().to_string(),
            "'count' query parameter is required."
        );
        assert_eq!(
            validate_count(Some("zero")).unwrap_err().to_string(),
            "'count' must be a positive integer."
        );
        assert_eq!(
            validate_count(Some("26")).unwrap_err().to_string(),
            "'count' cannot exceed the maximum value of 25."
        );
    }
}
