//! In-memory rating store for tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::account::domain::UserId;
use crate::rating::{
    domain::{Rating, RatingId},
    ports::{RatingRepository, RatingRepositoryError, RatingRepositoryResult, RatingTotals},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory rating repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRatingRepository {
    ratings: Arc<RwLock<HashMap<RatingId, Rating>>>,
}

impl InMemoryRatingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(
        &self,
        keep: impl Fn(&Rating) -> bool,
    ) -> RatingRepositoryResult<Vec<Rating>> {
        let ratings = self.ratings.read().map_err(lock_error)?;
        let mut matching: Vec<Rating> = ratings.values().filter(|r| keep(r)).cloned().collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(matching)
    }
}

fn lock_error(err: impl std::fmt::Display) -> RatingRepositoryError {
    RatingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn store(&self, rating: &Rating) -> RatingRepositoryResult<()> {
        let mut ratings = self.ratings.write().map_err(lock_error)?;
        if ratings.contains_key(&rating.id()) {
            return Err(RatingRepositoryError::DuplicateId(rating.id()));
        }
        if ratings.values().any(|existing| {
            existing.task_id() == rating.task_id() && existing.rater_id() == rating.rater_id()
        }) {
            return Err(RatingRepositoryError::DuplicateRating {
                task_id: rating.task_id(),
                rater: rating.rater_id(),
            });
        }
        ratings.insert(rating.id(), rating.clone());
        Ok(())
    }

    async fn find_by_task(&self, task_id: TaskId) -> RatingRepositoryResult<Vec<Rating>> {
        self.newest_first(|rating| rating.task_id() == task_id)
    }

    async fn find_by_task_and_rater(
        &self,
        task_id: TaskId,
        rater: UserId,
    ) -> RatingRepositoryResult<Option<Rating>> {
        let ratings = self.ratings.read().map_err(lock_error)?;
        Ok(ratings
            .values()
            .find(|rating| rating.task_id() == task_id && rating.rater_id() == rater)
            .cloned())
    }

    async fn list_received(
        &self,
        rated: UserId,
        limit: u32,
    ) -> RatingRepositoryResult<Vec<Rating>> {
        let mut received = self.newest_first(|rating| rating.rated_id() == rated)?;
        received.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(received)
    }

    async fn totals_for(&self, rated: UserId) -> RatingRepositoryResult<RatingTotals> {
        let ratings = self.ratings.read().map_err(lock_error)?;
        Ok(ratings
            .values()
            .filter(|rating| rating.rated_id() == rated)
            .fold(RatingTotals::default(), |totals, rating| RatingTotals {
                sum: totals.sum.saturating_add(u64::from(rating.score().value())),
                count: totals.count.saturating_add(1),
            }))
    }
}
