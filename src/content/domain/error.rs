//! Validation errors for editorial content.

use crate::slug::SlugError;
use thiserror::Error;

/// Errors returned while constructing or editing content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field exceeds its maximum length.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
    },

    /// The title or explicit slug produced no usable slug.
    #[error(transparent)]
    Slug(#[from] SlugError),
}

/// Error returned while parsing article statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown article status: {0}")]
pub struct ParseArticleStatusError(pub String);
