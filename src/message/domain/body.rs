//! Validated message text.

use crate::message::error::MessageBodyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trimmed, non-empty message text of at most [`MessageBody::MAX_LENGTH`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    /// Maximum body length in characters.
    pub const MAX_LENGTH: usize = 1000;

    /// Creates a validated body.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBodyError::Empty`] for blank input and
    /// [`MessageBodyError::TooLong`] past the limit.
    pub fn new(value: impl AsRef<str>) -> Result<Self, MessageBodyError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MessageBodyError::Empty);
        }
        let actual = trimmed.chars().count();
        if actual > Self::MAX_LENGTH {
            return Err(MessageBodyError::TooLong {
                max: Self::MAX_LENGTH,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the body as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
