//! Registration, login and profile management.

use crate::account::{
    domain::{
        AccountDomainError, EmailAddress, Gender, PublicProfile, User, UserId,
        UserProfile, Username,
    },
    ports::{PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError},
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new account.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    email: String,
    password: String,
}

impl RegisterUserRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Request payload replacing a user's profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
    phone: Option<String>,
    avatar: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<Gender>,
}

impl UpdateProfileRequest {
    /// Creates a request that clears every profile field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    /// Sets the biography.
    #[must_use]
    pub fn with_bio(mut self, value: impl Into<String>) -> Self {
        self.bio = Some(value.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    /// Sets the avatar path.
    #[must_use]
    pub fn with_avatar(mut self, value: impl Into<String>) -> Self {
        self.avatar = Some(value.into());
        self
    }

    /// Sets the date of birth.
    #[must_use]
    pub const fn with_date_of_birth(mut self, value: NaiveDate) -> Self {
        self.date_of_birth = Some(value);
        self
    }

    /// Sets the gender.
    #[must_use]
    pub const fn with_gender(mut self, value: Gender) -> Self {
        self.gender = Some(value);
        self
    }

    fn into_profile(self) -> Result<UserProfile, AccountDomainError> {
        Ok(UserProfile::new()
            .with_first_name(self.first_name)?
            .with_last_name(self.last_name)?
            .with_bio(self.bio)?
            .with_phone(self.phone)
            .with_avatar(self.avatar)
            .with_date_of_birth(self.date_of_birth)
            .with_gender(self.gender))
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AccountDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// The hashing backend failed.
    #[error(transparent)]
    Hashing(#[from] PasswordHashError),

    /// Email or password did not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account is banned. `until` is `None` for permanent bans.
    #[error("account is banned")]
    Banned {
        /// Expiry of a temporary ban.
        until: Option<DateTime<Utc>>,
    },

    /// No account has the given identifier.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No account has the given username.
    #[error("no user named '{0}'")]
    UnknownUsername(String),
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Account orchestration service.
#[derive(Clone)]
pub struct AccountService<R, H, C>
where
    R: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<R, H, C> AccountService<R, H, C>
where
    R: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            repository,
            hasher,
            clock,
        }
    }

    /// Registers a new account with the `User` role.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] for invalid input and
    /// [`AccountError::Repository`] when the username or email is taken.
    pub async fn register(&self, request: RegisterUserRequest) -> AccountResult<User> {
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        if request.password.is_empty() {
            return Err(AccountDomainError::EmptyPassword.into());
        }
        let hash = self.hasher.hash(&request.password)?;

        let user = User::register(username, email, hash, &*self.clock);
        self.repository.store(&user).await?;
        tracing::info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Verifies credentials and stamps the login time.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] on any mismatch and
    /// [`AccountError::Banned`] while a ban is active.
    pub async fn authenticate(&self, email: &str, password: &str) -> AccountResult<User> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(AccountError::InvalidCredentials);
        };
        let mut user = self
            .repository
            .find_by_email(&address)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self.hasher.verify(password, user.password_hash())? {
            tracing::warn!(user_id = %user.id(), "failed login attempt");
            return Err(AccountError::InvalidCredentials);
        }
        if let Some(ban) = user.active_ban(self.clock.utc()) {
            return Err(AccountError::Banned { until: ban.until() });
        }

        user.record_login(&*self.clock);
        self.repository
            .record_login(user.id(), user.updated_at())
            .await?;
        tracing::info!(user_id = %user.id(), "user signed in");
        Ok(user)
    }

    /// Returns the full account of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] for unknown users.
    pub async fn profile(&self, user_id: UserId) -> AccountResult<User> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound(user_id))
    }

    /// Replaces the profile fields of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] when a field is too long and
    /// [`AccountError::UserNotFound`] for unknown users.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> AccountResult<User> {
        let profile = request.into_profile()?;
        let mut user = self.profile(user_id).await?;
        user.update_profile(profile, &*self.clock);
        self.repository.update(&user).await?;
        tracing::info!(user_id = %user_id, "profile updated");
        Ok(user)
    }

    /// Returns the public projection of `username`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownUsername`] when nobody has that name.
    pub async fn public_profile(&self, username: &str) -> AccountResult<PublicProfile> {
        let user = self.find_by_username(username).await?;
        Ok(user.public_profile())
    }

    async fn find_by_username(&self, username: &str) -> AccountResult<User> {
        let unknown = || AccountError::UnknownUsername(username.to_owned());
        let name = Username::new(username).map_err(|_| unknown())?;
        self.repository
            .find_by_username(&name)
            .await?
            .ok_or_else(unknown)
    }
}
