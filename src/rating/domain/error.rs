//! Error types for rating validation.

use thiserror::Error;

/// Errors returned while validating rating input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RatingDomainError {
    /// The score is outside 1..=5.
    #[error("score must be between 1 and 5, got {0}")]
    InvalidScore(i64),

    /// The comment exceeds its maximum length.
    #[error("comment exceeds {max} characters")]
    CommentTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}
