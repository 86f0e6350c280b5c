//! Score and comment value objects.

use super::RatingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-star score from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    /// Lowest score.
    pub const MIN: u8 = 1;
    /// Highest score.
    pub const MAX: u8 = 5;

    /// Validates a raw score.
    ///
    /// # Errors
    ///
    /// Returns [`RatingDomainError::InvalidScore`] outside 1..=5.
    pub fn new(value: i64) -> Result<Self, RatingDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|score| (Self::MIN..=Self::MAX).contains(score))
            .map(Self)
            .ok_or(RatingDomainError::InvalidScore(value))
    }

    /// Returns the score.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = RatingDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        Self::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional free-text remark, at most 1000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingComment(String);

impl RatingComment {
    /// Maximum comment length in characters.
    pub const MAX_LENGTH: usize = 1000;

    /// Validates a comment. Blank input yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingDomainError::CommentTooLong`] past the limit.
    pub fn optional(value: Option<&str>) -> Result<Option<Self>, RatingDomainError> {
        let Some(trimmed) = value.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(RatingDomainError::CommentTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Returns the comment as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
