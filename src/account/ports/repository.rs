//! Repository port for account persistence and lookup.

use crate::account::domain::{BanStatus, EmailAddress, RatingSummary, User, UserId, Username};
use crate::pagination::{Page, PageRequest};
use crate::persistence::PersistenceFailure;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// Admin listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Restricts results to one stored ban classification.
    pub ban_status: Option<BanStatus>,
    /// Case-insensitive substring over username, email, first and last name.
    pub search: Option<String>,
}

impl UserFilter {
    /// Creates an unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a ban classification.
    #[must_use]
    pub const fn with_ban_status(mut self, status: BanStatus) -> Self {
        self.ban_status = Some(status);
        self
    }

    /// Sets the search term. Blank terms are ignored.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let raw = term.into();
        let trimmed = raw.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns `true` when `user` satisfies the filter.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let status_ok = self
            .ban_status
            .is_none_or(|status| user.ban_status() == status);
        let search_ok = self.search.as_deref().is_none_or(|term| {
            let needle = term.to_lowercase();
            let profile = user.profile();
            [
                Some(user.username().as_str()),
                Some(user.email().as_str()),
                profile.first_name(),
                profile.last_name(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
        });
        status_ok && search_ok
    }
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUsername`] or
    /// [`UserRepositoryError::DuplicateEmail`] when either is taken.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user.
    ///
    /// Rating totals and the last login time keep their stored values; only
    /// [`Self::store_rating_summary`] and [`Self::record_login`] write them.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Stamps a successful login without rewriting the rest of the record.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> UserRepositoryResult<()>;

    /// Stores recomputed rating totals.
    ///
    /// A summary counting fewer ratings than the stored one is ignored, so
    /// refreshes finishing out of order never move the totals backwards.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn store_rating_summary(
        &self,
        id: UserId,
        summary: RatingSummary,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>>;

    /// Returns one page of users matching `filter`, newest registration first.
    async fn list(&self, filter: &UserFilter, page: PageRequest)
    -> UserRepositoryResult<Page<User>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// The username is taken.
    #[error("username already taken: {0}")]
    DuplicateUsername(Username),

    /// The email is taken.
    #[error("email already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for UserRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for UserRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
