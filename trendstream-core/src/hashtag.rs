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

//! Hashtag extraction from post text.

use once_cell::sync::Lazy;
use regex::Regex;

// A hashtag is `#` followed by one or more Unicode letters, digits, or
// underscores. Anything else (punctuation, whitespace, emoji) ends the tag.
static HASHTAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[\p{L}\p{N}_]+").expect("hashtag pattern is valid"));

/// Extract every hashtag from `text`, lowercased, in order of appearance.
///
/// Repeated occurrences are kept: each one counts separately toward the
/// trending ranking. A `#` with no following word character is not a tag.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_order() {
        assert_eq!(
            extract_hashtags("Go #Rust, go #Tokio!"),
            vec!["#rust", "#tokio"]
        );
    }

    #[test]
    fn test_no_hashtags_yields_empty() {
        assert!(extract_hashtags("just a plain sentence").is_empty());
        assert!(extract_hashtags("").is_empty());
    }

    #[test]
    fn test_lone_hash_is_not_a_tag() {
        assert!(extract_hashtags("# nothing here").is_empty());
        assert_eq!(extract_hashtags("##double"), vec!["#double"]);
    }

    #[test]
    fn test_punctuation_ends_a_tag() {
        assert_eq!(extract_hashtags("#rust! #c++"), vec!["#rust", "#c"]);
        assert_eq!(extract_hashtags("(#wip)"), vec!["#wip"]);
    }

    #[test]
    fn test_digits_and_underscores_allowed() {
        assert_eq!(
            extract_hashtags("day 3 of #100DaysOfCode and #rust_lang"),
            vec!["#100daysofcode", "#rust_lang"]
        );
    }

    #[test]
    fn test_unicode_letters_and_case_folding() {
        assert_eq!(extract_hashtags("drinking #Çay"), vec!["#çay"]);
        assert_eq!(extract_hashtags("#Straße"), vec!["#straße"]);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        assert_eq!(
            extract_hashtags("#rust is great, I mean it: #rust"),
            vec!["#rust", "#rust"]
        );
        assert_eq!(
            extract_hashtags("#Foo and #foo and #bar_1"),
            vec!["#foo", "#foo", "#bar_1"]
        );
    }
}
