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

//! Validation failures for submitted posts and query parameters.
//!
//! The `Display` text of each variant is the exact message returned to API
//! callers in a 400 response body.

/// Rejection reasons for client-supplied input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The tweet field was absent or the empty string.
    #[error("Tweet is required.")]
    MissingContent,

    /// The tweet contained only whitespace.
    #[error("Tweet must be a non-empty string.")]
    EmptyContent,

    /// The tweet exceeded the character cap.
    #[error("Tweet exceeds maximum length of {max} characters.")]
    TooLong { max: usize },

    /// The `count` query parameter was absent.
    #[error("'count' query parameter is required.")]
    MissingParameter,

    /// The `count` query parameter was not a positive whole number.
    #[error("'count' must be a positive integer.")]
    NotAPositiveInteger,

    /// The `count` query parameter exceeded the query ceiling.
    #[error("'count' cannot exceed the maximum value of {max}.")]
    ExceedsMaximum { max: usize },
}
