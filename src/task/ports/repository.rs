//! Repository ports for task and response persistence.

use crate::account::domain::UserId;
use crate::pagination::{Page, PageRequest};
use crate::persistence::PersistenceFailure;
use crate::task::domain::{ModerationStatus, Response, ResponseId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task and response repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter for the administrator's task queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminTaskFilter {
    /// Restricts results to one moderation status.
    pub moderation: Option<ModerationStatus>,
    /// Restricts results to one lifecycle status.
    pub status: Option<TaskStatus>,
}

impl AdminTaskFilter {
    /// Creates an unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a moderation status.
    #[must_use]
    pub const fn with_moderation(mut self, moderation: ModerationStatus) -> Self {
        self.moderation = Some(moderation);
        self
    }

    /// Restricts results to a lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when `task` satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.moderation
            .is_none_or(|moderation| task.moderation().status == moderation)
            && self.status.is_none_or(|status| task.status() == status)
    }
}

/// The state of a task as last read by a writer.
///
/// Writes carry the revision they started from and are refused when the
/// stored task has moved on since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRevision {
    status: TaskStatus,
    updated_at: DateTime<Utc>,
}

impl TaskRevision {
    /// Captures the revision of `task` before it is modified.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        Self {
            status: task.status(),
            updated_at: task.updated_at(),
        }
    }

    /// Lifecycle status the writer saw.
    #[must_use]
    pub const fn status(self) -> TaskStatus {
        self.status
    }

    /// Update timestamp the writer saw.
    #[must_use]
    pub const fn updated_at(self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `stored` is still at this revision.
    #[must_use]
    pub fn matches(self, stored: &Task) -> bool {
        self == Self::of(stored)
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task still at `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Conflict`] when another write got there
    /// first.
    async fn update(&self, task: &Task, expected: TaskRevision) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns open, approved tasks, newest first.
    async fn list_open_approved(&self, page: PageRequest) -> TaskRepositoryResult<Page<Task>>;

    /// Returns the author's tasks in any state, newest first.
    async fn list_by_author(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>>;

    /// Returns tasks matching `filter`, newest first.
    async fn list(
        &self,
        filter: AdminTaskFilter,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>>;
}

/// Response persistence contract.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Stores a new response.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateResponse`] when the responder
    /// already responded to the task.
    async fn store_response(&self, response: &Response) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing response.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::ResponseNotFound`] when the response
    /// does not exist.
    async fn update_response(&self, response: &Response) -> TaskRepositoryResult<()>;

    /// Deletes a response.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::ResponseNotFound`] when the response
    /// does not exist.
    async fn delete_response(&self, id: ResponseId) -> TaskRepositoryResult<()>;

    /// Finds a response by identifier.
    async fn find_response(&self, id: ResponseId) -> TaskRepositoryResult<Option<Response>>;

    /// Returns every response to a task, newest first.
    async fn find_by_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Response>>;

    /// Finds the response a user sent to a task.
    async fn find_by_task_and_responder(
        &self,
        task_id: TaskId,
        responder: UserId,
    ) -> TaskRepositoryResult<Option<Response>>;

    /// Returns every response a user sent, newest first.
    async fn list_by_responder(&self, responder: UserId) -> TaskRepositoryResult<Vec<Response>>;

    /// Atomically stores an acceptance.
    ///
    /// Persists `task` and the accepted `response`, then marks every other
    /// pending response to the task as rejected. The task must still be at
    /// `expected` and the stored response must still be pending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] or
    /// [`TaskRepositoryError::ResponseNotFound`] when either record is gone,
    /// and [`TaskRepositoryError::Conflict`] when either changed since it
    /// was read.
    async fn record_acceptance(
        &self,
        task: &Task,
        response: &Response,
        expected: TaskRevision,
    ) -> TaskRepositoryResult<()>;
}

/// Errors returned by task and response repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The responder already responded to the task.
    #[error("user {responder} already responded to task {task_id}")]
    DuplicateResponse {
        /// Task identifier.
        task_id: TaskId,
        /// Responding user.
        responder: UserId,
    },

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The response was not found.
    #[error("response not found: {0}")]
    ResponseNotFound(ResponseId),

    /// The task or its response changed after the writer read it.
    #[error("task {0} was changed concurrently")]
    Conflict(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for TaskRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
