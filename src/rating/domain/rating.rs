//! Rating entity.

use super::{RatingComment, RatingId, Score};
use crate::account::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A score one task participant gave the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    id: RatingId,
    task_id: TaskId,
    rater_id: UserId,
    rated_id: UserId,
    score: Score,
    comment: Option<RatingComment>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRatingData {
    /// Persisted rating identifier.
    pub id: RatingId,
    /// Rated task.
    pub task_id: TaskId,
    /// User who left the rating.
    pub rater_id: UserId,
    /// User who received it.
    pub rated_id: UserId,
    /// Persisted score.
    pub score: Score,
    /// Persisted comment.
    pub comment: Option<RatingComment>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Creates a rating.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        rater_id: UserId,
        rated_id: UserId,
        score: Score,
        comment: Option<RatingComment>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: RatingId::new(),
            task_id,
            rater_id,
            rated_id,
            score,
            comment,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a rating from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRatingData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            rater_id: data.rater_id,
            rated_id: data.rated_id,
            score: data.score,
            comment: data.comment,
            created_at: data.created_at,
        }
    }

    /// Returns the rating identifier.
    #[must_use]
    pub const fn id(&self) -> RatingId {
        self.id
    }

    /// Returns the rated task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user who left the rating.
    #[must_use]
    pub const fn rater_id(&self) -> UserId {
        self.rater_id
    }

    /// Returns the user who received the rating.
    #[must_use]
    pub const fn rated_id(&self) -> UserId {
        self.rated_id
    }

    /// Returns the score.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Returns the comment, if any.
    #[must_use]
    pub const fn comment(&self) -> Option<&RatingComment> {
        self.comment.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
