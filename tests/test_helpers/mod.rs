//! Shared in-memory marketplace harness for integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use taskboard::access::{AccessGuard, AdminActor};
use taskboard::account::{
    adapters::memory::InMemoryUserRepository,
    domain::{PasswordHash, Role, User, UserId},
    ports::{PasswordHashError, PasswordHasher},
    services::{AccountService, RegisterUserRequest, RoleService, UserModerationService},
};
use taskboard::catalog::domain::CategoryId;
use taskboard::config::ListingConfig;
use taskboard::message::{adapters::memory::InMemoryMessageRepository, services::MessagingService};
use taskboard::rating::{adapters::memory::InMemoryRatingRepository, services::RatingService};
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Response, Task},
    services::{CreateTaskRequest, TaskLifecycleService, TaskModerationService},
};

/// Password used for every account registered through the harness.
pub const PASSWORD: &str = "correct horse battery staple";

const PLAIN_PREFIX: &str = "plain$";

/// Reversible hasher that keeps integration tests fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        hash.as_str()
            .strip_prefix(PLAIN_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError("hash was not produced by PlainHasher".to_owned()))
    }
}

/// Every marketplace service wired to shared in-memory stores.
pub struct Marketplace {
    pub listing: ListingConfig,
    pub accounts: AccountService<InMemoryUserRepository, PlainHasher, DefaultClock>,
    pub roles: RoleService<InMemoryUserRepository, DefaultClock>,
    pub guard: AccessGuard<InMemoryUserRepository, DefaultClock>,
    pub user_moderation: UserModerationService<InMemoryUserRepository, DefaultClock>,
    pub lifecycle: TaskLifecycleService<InMemoryTaskRepository, DefaultClock>,
    pub task_moderation: TaskModerationService<InMemoryTaskRepository, DefaultClock>,
    pub messaging:
        MessagingService<InMemoryTaskRepository, InMemoryMessageRepository, DefaultClock>,
    pub ratings: RatingService<
        InMemoryTaskRepository,
        InMemoryRatingRepository,
        InMemoryUserRepository,
        DefaultClock,
    >,
}

impl Marketplace {
    /// Wires a fresh marketplace with the default listing limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_listing(ListingConfig::default())
    }

    /// Wires a fresh marketplace with custom listing limits.
    #[must_use]
    pub fn with_listing(listing: ListingConfig) -> Self {
        let clock = Arc::new(DefaultClock);
        let users = Arc::new(InMemoryUserRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let ratings = Arc::new(InMemoryRatingRepository::new());

        Self {
            listing,
            accounts: AccountService::new(
                Arc::clone(&users),
                Arc::new(PlainHasher),
                Arc::clone(&clock),
            ),
            roles: RoleService::new(Arc::clone(&users), Arc::clone(&clock)),
            guard: AccessGuard::new(Arc::clone(&users), Arc::clone(&clock)),
            user_moderation: UserModerationService::new(Arc::clone(&users), Arc::clone(&clock)),
            lifecycle: TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            task_moderation: TaskModerationService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            messaging: MessagingService::new(Arc::clone(&tasks), messages, Arc::clone(&clock)),
            ratings: RatingService::new(tasks, ratings, users, clock).with_listing(&listing),
        }
    }

    /// Registers `username` with a derived email address.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn register(&self, username: &str) -> eyre::Result<User> {
        let request =
            RegisterUserRequest::new(username, format!("{username}@example.com"), PASSWORD);
        Ok(self.accounts.register(request).await?)
    }

    /// Registers `username`, promotes it and passes the administrator gate.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub async fn admin(&self, username: &str) -> eyre::Result<AdminActor> {
        let user = self.register(username).await?;
        self.roles.set_role(username, Role::Admin).await?;
        Ok(self.guard.require_admin(Some(user.id())).await?)
    }

    /// Posts a remote task for `author` and approves it.
    ///
    /// # Errors
    ///
    /// Returns an error if posting or approval fails.
    pub async fn approved_task(
        &self,
        admin: &AdminActor,
        author: UserId,
        title: &str,
    ) -> eyre::Result<Task> {
        let request = CreateTaskRequest::new(title, "Details to follow", CategoryId::new());
        let task = self.lifecycle.create_task(author, request).await?;
        Ok(self
            .task_moderation
            .approve(admin, task.id(), None)
            .await?)
    }

    /// Approves a task for `author` and hands it to `executor`.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub async fn task_in_progress(
        &self,
        admin: &AdminActor,
        author: UserId,
        executor: UserId,
    ) -> eyre::Result<(Task, Response)> {
        let task = self.approved_task(admin, author, "Paint the fence").await?;
        let response = self
            .lifecycle
            .respond(task.id(), executor, "I can start tomorrow")
            .await?;
        let started = self
            .lifecycle
            .accept_response(task.id(), response.id(), author)
            .await?;
        Ok((started, response))
    }
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}
