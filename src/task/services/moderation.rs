//! Administrator moderation queue for posted tasks.

use crate::access::AdminActor;
use crate::pagination::{Page, PageRequest};
use crate::task::{
    domain::{Response, Task, TaskDomainError, TaskId},
    ports::{
        AdminTaskFilter, ResponseRepository, TaskRepository, TaskRepositoryError, TaskRevision,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task moderation.
#[derive(Debug, Error)]
pub enum TaskModerationError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Result type for task moderation operations.
pub type TaskModerationResult<T> = Result<T, TaskModerationError>;

/// A task together with its responses, for the admin detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratedTask {
    /// The task.
    pub task: Task,
    /// Every response, newest first.
    pub responses: Vec<Response>,
}

/// Moderation gate deciding which tasks the public sees.
///
/// Decisions never touch the lifecycle status.
#[derive(Clone)]
pub struct TaskModerationService<R, C>
where
    R: TaskRepository + ResponseRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskModerationService<R, C>
where
    R: TaskRepository + ResponseRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task moderation service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskModerationError::Repository`] when the lookup fails.
    pub async fn list(
        &self,
        _admin: &AdminActor,
        filter: AdminTaskFilter,
        page: PageRequest,
    ) -> TaskModerationResult<Page<Task>> {
        Ok(self.repository.list(filter, page).await?)
    }

    /// Loads a task in any state with its responses.
    ///
    /// # Errors
    ///
    /// Returns [`TaskModerationError::TaskNotFound`] for unknown tasks.
    pub async fn detail(
        &self,
        _admin: &AdminActor,
        task_id: TaskId,
    ) -> TaskModerationResult<ModeratedTask> {
        let task = self.load(task_id).await?;
        let responses = self.repository.find_by_task(task_id).await?;
        Ok(ModeratedTask { task, responses })
    }

    /// Approves a task, making it public. Blank comments are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskModerationError::TaskNotFound`] for unknown tasks.
    pub async fn approve(
        &self,
        admin: &AdminActor,
        task_id: TaskId,
        comment: Option<&str>,
    ) -> TaskModerationResult<Task> {
        let mut task = self.load(task_id).await?;
        let revision = TaskRevision::of(&task);
        task.approve(admin.user_id(), comment, &*self.clock);
        self.save(admin, &task, revision, "task approved").await?;
        Ok(task)
    }

    /// Rejects a task with an explanation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] for a blank comment.
    pub async fn reject(
        &self,
        admin: &AdminActor,
        task_id: TaskId,
        comment: &str,
    ) -> TaskModerationResult<Task> {
        let mut task = self.load(task_id).await?;
        let revision = TaskRevision::of(&task);
        task.reject(admin.user_id(), comment, &*self.clock)?;
        self.save(admin, &task, revision, "task rejected").await?;
        Ok(task)
    }

    /// Puts a task back into the moderation queue.
    ///
    /// # Errors
    ///
    /// Returns [`TaskModerationError::TaskNotFound`] for unknown tasks.
    pub async fn return_to_pending(
        &self,
        admin: &AdminActor,
        task_id: TaskId,
    ) -> TaskModerationResult<Task> {
        let mut task = self.load(task_id).await?;
        let revision = TaskRevision::of(&task);
        task.return_to_pending(admin.user_id(), &*self.clock);
        self.save(admin, &task, revision, "task returned to moderation").await?;
        Ok(task)
    }

    async fn save(
        &self,
        admin: &AdminActor,
        task: &Task,
        revision: TaskRevision,
        event: &'static str,
    ) -> TaskModerationResult<()> {
        self.repository.update(task, revision).await?;
        tracing::info!(
            task_id = %task.id(),
            moderator = %admin.user_id(),
            status = task.moderation().status.as_str(),
            "{event}"
        );
        Ok(())
    }

    async fn load(&self, task_id: TaskId) -> TaskModerationResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskModerationError::TaskNotFound(task_id))
    }
}
