//! Error types for message validation and persistence.

use super::domain::MessageId;
use crate::persistence::PersistenceFailure;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while validating a message body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageBodyError {
    /// The body is empty after trimming.
    #[error("message cannot be empty")]
    Empty,

    /// The body exceeds the length limit.
    #[error("message is {actual} characters long, the limit is {max}")]
    TooLong {
        /// Maximum permitted length in characters.
        max: usize,
        /// Actual length in characters.
        actual: usize,
    },
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for MessageRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for MessageRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
