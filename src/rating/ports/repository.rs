//! Repository port for rating persistence and aggregation.

use crate::account::domain::UserId;
use crate::persistence::PersistenceFailure;
use crate::rating::domain::{Rating, RatingId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for rating repository operations.
pub type RatingRepositoryResult<T> = Result<T, RatingRepositoryError>;

/// Sum and count of every score a user received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTotals {
    /// Sum of scores.
    pub sum: u64,
    /// Number of ratings.
    pub count: u64,
}

/// Rating persistence contract.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Stores a new rating.
    ///
    /// # Errors
    ///
    /// Returns [`RatingRepositoryError::DuplicateRating`] when the rater
    /// already rated the task.
    async fn store(&self, rating: &Rating) -> RatingRepositoryResult<()>;

    /// Returns a task's ratings, newest first.
    async fn find_by_task(&self, task_id: TaskId) -> RatingRepositoryResult<Vec<Rating>>;

    /// Finds the rating `rater` left on a task.
    async fn find_by_task_and_rater(
        &self,
        task_id: TaskId,
        rater: UserId,
    ) -> RatingRepositoryResult<Option<Rating>>;

    /// Returns up to `limit` ratings `rated` received, newest first.
    async fn list_received(
        &self,
        rated: UserId,
        limit: u32,
    ) -> RatingRepositoryResult<Vec<Rating>>;

    /// Aggregates every rating `rated` received.
    async fn totals_for(&self, rated: UserId) -> RatingRepositoryResult<RatingTotals>;
}

/// Errors returned by rating repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RatingRepositoryError {
    /// A rating with the same identifier already exists.
    #[error("duplicate rating identifier: {0}")]
    DuplicateId(RatingId),

    /// The rater already rated the task.
    #[error("user {rater} already rated task {task_id}")]
    DuplicateRating {
        /// Rated task.
        task_id: TaskId,
        /// User who left the rating.
        rater: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RatingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for RatingRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for RatingRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
