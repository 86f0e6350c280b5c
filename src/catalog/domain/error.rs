//! Validation errors for catalog entries.

use crate::slug::SlugError;
use thiserror::Error;

/// Errors returned while constructing or editing catalog entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The region is not listed in the region catalog.
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// The city name produced no usable slug.
    #[error(transparent)]
    Slug(#[from] SlugError),
}
