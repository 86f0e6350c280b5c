//! Validated free-text values used by tasks and responses.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn bounded_text(
    field: &'static str,
    value: String,
    max: Option<usize>,
) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyField { field });
    }
    if let Some(limit) = max.filter(|limit| trimmed.chars().count() > *limit) {
        return Err(TaskDomainError::FieldTooLong { field, max: limit });
    }
    Ok(trimmed.to_owned())
}

/// Task headline, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Maximum title length in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the trimmed value is empty or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        bounded_text("title", value.into(), Some(Self::MAX_LENGTH)).map(Self)
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task body, at most 5000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Maximum description length in characters.
    pub const MAX_LENGTH: usize = 5000;

    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the trimmed value is empty or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        bounded_text("description", value.into(), Some(Self::MAX_LENGTH)).map(Self)
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pitch a responder sends to the author, at most 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseMessage(String);

impl ResponseMessage {
    /// Maximum response length in characters.
    pub const MAX_LENGTH: usize = 2000;

    /// Creates a validated response message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the trimmed value is empty or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        bounded_text("message", value.into(), Some(Self::MAX_LENGTH)).map(Self)
    }

    /// Returns the message as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Moderator's note attached to an approval or rejection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModerationComment(String);

impl ModerationComment {
    /// Creates a validated comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        bounded_text("moderation comment", value.into(), None).map(Self)
    }

    /// Returns `None` for blank input instead of an error.
    #[must_use]
    pub fn optional(value: Option<&str>) -> Option<Self> {
        value.and_then(|text| Self::new(text).ok())
    }

    /// Returns the comment as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
