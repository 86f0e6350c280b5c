//! Administrator actions on user accounts: warnings and bans.

use crate::access::AdminActor;
use crate::account::{
    domain::{AccountDomainError, BanDays, User, UserId, Warning, WarningId},
    ports::{UserFilter, UserRepository, UserRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for user moderation.
#[derive(Debug, Error)]
pub enum UserModerationError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AccountDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// The target user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
}

/// Result type for user moderation operations.
pub type UserModerationResult<T> = Result<T, UserModerationError>;

/// User moderation service for the admin surface.
#[derive(Clone)]
pub struct UserModerationService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserModerationService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user moderation service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists users, newest registration first.
    ///
    /// # Errors
    ///
    /// Returns [`UserModerationError::Repository`] when the lookup fails.
    pub async fn list_users(
        &self,
        _admin: &AdminActor,
        filter: &UserFilter,
        page: PageRequest,
    ) -> UserModerationResult<Page<User>> {
        Ok(self.repository.list(filter, page).await?)
    }

    /// Loads one user with warnings and ban details.
    ///
    /// # Errors
    ///
    /// Returns [`UserModerationError::UserNotFound`] for unknown users.
    pub async fn user_detail(
        &self,
        _admin: &AdminActor,
        user_id: UserId,
    ) -> UserModerationResult<User> {
        self.load(user_id).await
    }

    /// Issues a warning.
    ///
    /// # Errors
    ///
    /// Returns [`UserModerationError::Domain`] for a blank reason.
    pub async fn issue_warning(
        &self,
        admin: &AdminActor,
        user_id: UserId,
        reason: &str,
    ) -> UserModerationResult<Warning> {
        let mut user = self.load(user_id).await?;
        let warning = user.issue_warning(reason, admin.user_id(), &*self.clock)?;
        self.repository.update(&user).await?;
        tracing::info!(
            user_id = %user_id,
            warning_id = %warning.id(),
            moderator = %admin.user_id(),
            "warning issued"
        );
        Ok(warning)
    }

    /// Removes a warning.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::WarningNotFound`] when the warning does
    /// not belong to the user.
    pub async fn remove_warning(
        &self,
        admin: &AdminActor,
        user_id: UserId,
        warning_id: WarningId,
    ) -> UserModerationResult<User> {
        let mut user = self.load(user_id).await?;
        user.remove_warning(warning_id, &*self.clock)?;
        self.repository.update(&user).await?;
        tracing::info!(
            user_id = %user_id,
            warning_id = %warning_id,
            moderator = %admin.user_id(),
            "warning removed"
        );
        Ok(user)
    }

    /// Bans a user for `days` (seven when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::InvalidBanDays`] outside 1..=365,
    /// [`AccountDomainError::CannotBanAdmin`] for administrators and
    /// [`AccountDomainError::EmptyReason`] for a blank reason.
    pub async fn ban_temporarily(
        &self,
        admin: &AdminActor,
        user_id: UserId,
        reason: &str,
        days: Option<i64>,
    ) -> UserModerationResult<User> {
        let length = days.map_or_else(|| Ok(BanDays::default()), BanDays::new)?;
        let mut user = self.load(user_id).await?;
        user.ban_temporarily(reason, length, admin.user_id(), &*self.clock)?;
        self.repository.update(&user).await?;
        tracing::info!(
            user_id = %user_id,
            days = length.value(),
            moderator = %admin.user_id(),
            "user banned temporarily"
        );
        Ok(user)
    }

    /// Bans a user until an administrator lifts the ban.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::CannotBanAdmin`] for administrators and
    /// [`AccountDomainError::EmptyReason`] for a blank reason.
    pub async fn ban_permanently(
        &self,
        admin: &AdminActor,
        user_id: UserId,
        reason: &str,
    ) -> UserModerationResult<User> {
        let mut user = self.load(user_id).await?;
        user.ban_permanently(reason, admin.user_id(), &*self.clock)?;
        self.repository.update(&user).await?;
        tracing::info!(
            user_id = %user_id,
            moderator = %admin.user_id(),
            "user banned permanently"
        );
        Ok(user)
    }

    /// Lifts any ban.
    ///
    /// # Errors
    ///
    /// Returns [`UserModerationError::UserNotFound`] for unknown users.
    pub async fn unban(&self, admin: &AdminActor, user_id: UserId) -> UserModerationResult<User> {
        let mut user = self.load(user_id).await?;
        user.unban(&*self.clock);
        self.repository.update(&user).await?;
        tracing::info!(user_id = %user_id, moderator = %admin.user_id(), "user unbanned");
        Ok(user)
    }

    async fn load(&self, user_id: UserId) -> UserModerationResult<User> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserModerationError::UserNotFound(user_id))
    }
}
