//! Rating workflow for closed tasks and profile rating listings.

use crate::account::{
    domain::{PublicProfile, RatingSummary, UserId, Username},
    ports::{UserRepository, UserRepositoryError},
};
use crate::config::ListingConfig;
use crate::rating::{
    domain::{
        IneligibleReason, Rating, RatingComment, RatingDomainError, RatingEligibility, Score,
    },
    ports::{RatingRepository, RatingRepositoryError},
};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for rating a task counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateUserRequest {
    rated: UserId,
    score: i64,
    comment: Option<String>,
}

impl RateUserRequest {
    /// Creates a request without a comment.
    #[must_use]
    pub const fn new(rated: UserId, score: i64) -> Self {
        Self {
            rated,
            score,
            comment: None,
        }
    }

    /// Attaches a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Ratings shown on a public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRatings {
    /// Profile of the rated user.
    pub profile: PublicProfile,
    /// Most recent ratings, newest first.
    pub ratings: Vec<Rating>,
    /// Average and count over every rating received.
    pub summary: RatingSummary,
}

/// Service-level errors for ratings.
#[derive(Debug, Error)]
pub enum RatingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RatingDomainError),

    /// Rating repository operation failed.
    #[error(transparent)]
    Repository(#[from] RatingRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task is not closed yet.
    #[error("task {0} must be closed before rating")]
    TaskNotClosed(TaskId),

    /// The rater is not a participant of the task.
    #[error("only task participants may rate")]
    NotParticipant,

    /// The rated user is not a participant of the task.
    #[error("user {0} did not take part in the task")]
    RatedNotParticipant(UserId),

    /// Users cannot rate themselves.
    #[error("users cannot rate themselves")]
    SelfRating,

    /// The rater already rated this task.
    #[error("task {0} already rated by this user")]
    AlreadyRated(TaskId),

    /// The rated account no longer exists.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Nobody has the given username.
    #[error("unknown username: {0}")]
    UnknownUsername(String),
}

/// Result type for rating operations.
pub type RatingResult<T> = Result<T, RatingError>;

/// Rating ledger service.
#[derive(Clone)]
pub struct RatingService<T, R, U, C>
where
    T: TaskRepository,
    R: RatingRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    ratings: Arc<R>,
    users: Arc<U>,
    clock: Arc<C>,
    user_ratings_limit: u32,
}

impl<T, R, U, C> RatingService<T, R, U, C>
where
    T: TaskRepository,
    R: RatingRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new rating service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, ratings: Arc<R>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            ratings,
            users,
            clock,
            user_ratings_limit: ListingConfig::DEFAULT.user_ratings_limit,
        }
    }

    /// Applies the configured profile rating limit.
    ///
    /// The summary always covers every rating; the limit only caps the
    /// listed ones.
    #[must_use]
    pub fn with_listing(mut self, listing: &ListingConfig) -> Self {
        self.user_ratings_limit = listing.user_ratings_limit.max(1);
        self
    }

    /// Rates the other participant of a closed task and refreshes their
    /// rating summary.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::TaskNotClosed`], [`RatingError::NotParticipant`],
    /// [`RatingError::RatedNotParticipant`], [`RatingError::SelfRating`] or
    /// [`RatingError::AlreadyRated`] when the rating is not allowed.
    pub async fn rate(
        &self,
        task_id: TaskId,
        rater: UserId,
        request: RateUserRequest,
    ) -> RatingResult<Rating> {
        let score = Score::new(request.score)?;
        let comment = RatingComment::optional(request.comment.as_deref())?;
        let task = self.load(task_id).await?;
        if task.status() != TaskStatus::Closed {
            return Err(RatingError::TaskNotClosed(task_id));
        }
        if !task.is_participant(rater) {
            tracing::warn!(task_id = %task_id, user_id = %rater, "rating by non-participant refused");
            return Err(RatingError::NotParticipant);
        }
        if !task.is_participant(request.rated) {
            return Err(RatingError::RatedNotParticipant(request.rated));
        }
        if request.rated == rater {
            return Err(RatingError::SelfRating);
        }
        if self
            .ratings
            .find_by_task_and_rater(task_id, rater)
            .await?
            .is_some()
        {
            return Err(RatingError::AlreadyRated(task_id));
        }

        let rating = Rating::new(task_id, rater, request.rated, score, comment, &*self.clock);
        self.ratings.store(&rating).await.map_err(|err| match err {
            RatingRepositoryError::DuplicateRating { .. } => RatingError::AlreadyRated(task_id),
            other => RatingError::Repository(other),
        })?;
        let summary = self.refresh_summary(request.rated).await?;
        tracing::info!(
            task_id = %task_id,
            rating_id = %rating.id(),
            rated = %request.rated,
            total = summary.total(),
            "rating stored"
        );
        Ok(rating)
    }

    /// Reports whether `viewer` may rate on a task and whom.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::Tasks`] or [`RatingError::Repository`] when a
    /// lookup fails. Every business refusal is reported as
    /// [`RatingEligibility::Ineligible`].
    pub async fn eligibility(
        &self,
        task_id: TaskId,
        viewer: Option<UserId>,
    ) -> RatingResult<RatingEligibility> {
        let Some(user) = viewer else {
            return Ok(RatingEligibility::Ineligible(IneligibleReason::Anonymous));
        };
        let Some(task) = self.tasks.find_by_id(task_id).await? else {
            return Ok(RatingEligibility::Ineligible(IneligibleReason::TaskNotFound));
        };
        if task.status() != TaskStatus::Closed {
            return Ok(RatingEligibility::Ineligible(IneligibleReason::TaskNotClosed));
        }
        if !task.is_participant(user) {
            return Ok(RatingEligibility::Ineligible(IneligibleReason::NotParticipant));
        }
        if self
            .ratings
            .find_by_task_and_rater(task_id, user)
            .await?
            .is_some()
        {
            return Ok(RatingEligibility::Ineligible(IneligibleReason::AlreadyRated));
        }
        Ok(task.counterpart_of(user).map_or(
            RatingEligibility::Ineligible(IneligibleReason::NoCounterpart),
            |rated| RatingEligibility::Eligible {
                rated,
                rater_is_author: task.is_author(user),
            },
        ))
    }

    /// Lists a task's ratings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::Repository`] when the lookup fails.
    pub async fn task_ratings(&self, task_id: TaskId) -> RatingResult<Vec<Rating>> {
        Ok(self.ratings.find_by_task(task_id).await?)
    }

    /// Lists the latest ratings a user received, with totals over all of them.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::UnknownUsername`] when nobody has that name.
    pub async fn user_ratings(&self, username: &str) -> RatingResult<UserRatings> {
        let unknown = || RatingError::UnknownUsername(username.to_owned());
        let name = Username::new(username).map_err(|_| unknown())?;
        let user = self
            .users
            .find_by_username(&name)
            .await?
            .ok_or_else(unknown)?;
        let ratings = self
            .ratings
            .list_received(user.id(), self.user_ratings_limit)
            .await?;
        let totals = self.ratings.totals_for(user.id()).await?;
        tracing::debug!(user_id = %user.id(), listed = ratings.len(), "user ratings loaded");
        Ok(UserRatings {
            profile: user.public_profile(),
            ratings,
            summary: RatingSummary::from_totals(totals.sum, totals.count),
        })
    }

    async fn refresh_summary(&self, rated: UserId) -> RatingResult<RatingSummary> {
        let totals = self.ratings.totals_for(rated).await?;
        let summary = RatingSummary::from_totals(totals.sum, totals.count);
        self.users
            .store_rating_summary(rated, summary, self.clock.utc())
            .await
            .map_err(|err| match err {
                UserRepositoryError::NotFound(id) => RatingError::UserNotFound(id),
                other => RatingError::Users(other),
            })?;
        Ok(summary)
    }

    async fn load(&self, task_id: TaskId) -> RatingResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(RatingError::TaskNotFound(task_id))
    }
}
