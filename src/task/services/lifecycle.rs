//! Service layer for posting tasks, responding and carrying work through to
//! closure.

use crate::account::domain::UserId;
use crate::catalog::domain::{CategoryId, CityId};
use crate::pagination::{Page, PageRequest};
use crate::task::{
    domain::{
        Response, ResponseId, ResponseMessage, Task, TaskContent, TaskDescription,
        TaskDomainError, TaskId, TaskLocation, TaskTitle,
    },
    ports::{ResponseRepository, TaskRepository, TaskRepositoryError, TaskRevision},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for posting or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    category_id: CategoryId,
    location_type: String,
    city_id: Option<CityId>,
}

/// Edits carry the full task content, like creation.
pub type EditTaskRequest = CreateTaskRequest;

impl CreateTaskRequest {
    /// Creates a request for remote work.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category_id: CategoryId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category_id,
            location_type: TaskLocation::Remote.location_type().to_owned(),
            city_id: None,
        }
    }

    /// Sets the raw location type (`city` or `remote`).
    #[must_use]
    pub fn with_location_type(mut self, location_type: impl Into<String>) -> Self {
        self.location_type = location_type.into();
        self
    }

    /// Places the work on site in `city_id`.
    #[must_use]
    pub fn in_city(mut self, city_id: CityId) -> Self {
        "city".clone_into(&mut self.location_type);
        self.city_id = Some(city_id);
        self
    }

    fn into_content(self) -> Result<TaskContent, TaskDomainError> {
        Ok(TaskContent {
            title: TaskTitle::new(self.title)?,
            description: TaskDescription::new(self.description)?,
            category_id: self.category_id,
            location: TaskLocation::from_parts(&self.location_type, self.city_id)?,
        })
    }
}

/// Task detail as shown to one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetail {
    /// The task.
    pub task: Task,
    /// Every response, newest first.
    pub responses: Vec<Response>,
    /// Whether the viewer wrote the task.
    pub is_author: bool,
    /// Whether the viewer already responded.
    pub has_responded: bool,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// The task does not exist or is hidden from the viewer.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The response does not exist on the task.
    #[error("response not found: {0}")]
    ResponseNotFound(ResponseId),

    /// The user already responded to the task.
    #[error("already responded to task {0}")]
    AlreadyResponded(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository + ResponseRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository + ResponseRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Posts a new task. It stays hidden until an administrator approves it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for invalid content.
    pub async fn create_task(
        &self,
        author: UserId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let task = Task::new(request.into_content()?, author, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), author = %author, "task created");
        Ok(task)
    }

    /// Replaces the content of an open task and resubmits it for moderation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskAuthor`] or
    /// [`TaskDomainError::TaskNotOpen`] when the edit is not allowed, and
    /// [`TaskRepositoryError::Conflict`] when the task changed meanwhile.
    pub async fn edit_task(
        &self,
        author: UserId,
        task_id: TaskId,
        request: EditTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let content = request.into_content()?;
        let mut task = self.load(task_id).await?;
        let revision = TaskRevision::of(&task);
        task.edit(author, content, &*self.clock).inspect_err(|_| {
            tracing::warn!(task_id = %task_id, user_id = %author, "task edit refused");
        })?;
        self.repository
            .update(&task, revision)
            .await
            .inspect_err(|err| warn_on_conflict(err, "task edit lost a race"))?;
        tracing::info!(task_id = %task_id, "task edited and returned to moderation");
        Ok(task)
    }

    /// Lists open, approved tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn open_tasks(&self, page: PageRequest) -> TaskLifecycleResult<Page<Task>> {
        Ok(self.repository.list_open_approved(page).await?)
    }

    /// Lists the author's own tasks in any state, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn my_tasks(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> TaskLifecycleResult<Page<Task>> {
        Ok(self.repository.list_by_author(author, page).await?)
    }

    /// Loads a task with its responses for `viewer`.
    ///
    /// Unapproved tasks are only shown to their author and executor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown or hidden
    /// tasks.
    pub async fn task_detail(
        &self,
        task_id: TaskId,
        viewer: Option<UserId>,
    ) -> TaskLifecycleResult<TaskDetail> {
        let task = self.load(task_id).await?;
        if !task.is_visible_to(viewer) {
            tracing::debug!(task_id = %task_id, "hidden task requested");
            return Err(TaskLifecycleError::TaskNotFound(task_id));
        }
        let responses = self.repository.find_by_task(task_id).await?;
        let is_author = viewer.is_some_and(|user| task.is_author(user));
        let has_responded = viewer.is_some_and(|user| {
            responses
                .iter()
                .any(|response| response.responder_id() == user)
        });
        Ok(TaskDetail {
            task,
            responses,
            is_author,
            has_responded,
        })
    }

    /// Responds to an open, approved task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AlreadyResponded`] on a second response,
    /// or [`TaskLifecycleError::Domain`] when the task does not accept
    /// responses from `responder`.
    pub async fn respond(
        &self,
        task_id: TaskId,
        responder: UserId,
        message: &str,
    ) -> TaskLifecycleResult<Response> {
        let text = ResponseMessage::new(message)?;
        let task = self.load(task_id).await?;
        task.ensure_accepts_responses_from(responder)?;
        if self
            .repository
            .find_by_task_and_responder(task_id, responder)
            .await?
            .is_some()
        {
            tracing::warn!(task_id = %task_id, user_id = %responder, "duplicate response refused");
            return Err(TaskLifecycleError::AlreadyResponded(task_id));
        }

        let response = Response::new(task_id, responder, text, &*self.clock);
        self.repository
            .store_response(&response)
            .await
            .map_err(|err| match err {
                TaskRepositoryError::DuplicateResponse { .. } => {
                    TaskLifecycleError::AlreadyResponded(task_id)
                }
                other => TaskLifecycleError::Repository(other),
            })?;
        tracing::info!(
            task_id = %task_id,
            response_id = %response.id(),
            responder = %responder,
            "response submitted"
        );
        Ok(response)
    }

    /// Replaces the message of a pending response while the task is open.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ResponseNotFound`] or a domain error
    /// when the edit is not allowed.
    pub async fn edit_response(
        &self,
        task_id: TaskId,
        response_id: ResponseId,
        responder: UserId,
        message: &str,
    ) -> TaskLifecycleResult<Response> {
        let text = ResponseMessage::new(message)?;
        let (task, mut response) = self.load_pair(task_id, response_id).await?;
        task.ensure_open()?;
        response.edit(responder, text, &*self.clock)?;
        self.repository.update_response(&response).await?;
        tracing::info!(response_id = %response_id, "response edited");
        Ok(response)
    }

    /// Deletes a pending response while the task is open.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ResponseNotFound`] or a domain error
    /// when the withdrawal is not allowed.
    pub async fn withdraw_response(
        &self,
        task_id: TaskId,
        response_id: ResponseId,
        responder: UserId,
    ) -> TaskLifecycleResult<()> {
        let (task, response) = self.load_pair(task_id, response_id).await?;
        response.ensure_responder(responder)?;
        task.ensure_open()?;
        response.ensure_pending()?;
        self.repository.delete_response(response_id).await?;
        tracing::info!(task_id = %task_id, response_id = %response_id, "response withdrawn");
        Ok(())
    }

    /// Accepts one response, rejecting the others and starting work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskAuthor`],
    /// [`TaskDomainError::ResponseTaskMismatch`] or
    /// [`TaskDomainError::InvalidStatusTransition`]. A concurrent acceptance
    /// or edit surfaces as [`TaskRepositoryError::Conflict`].
    pub async fn accept_response(
        &self,
        task_id: TaskId,
        response_id: ResponseId,
        author: UserId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let mut response = self
            .repository
            .find_response(response_id)
            .await?
            .ok_or(TaskLifecycleError::ResponseNotFound(response_id))?;
        let revision = TaskRevision::of(&task);
        task.accept(author, &response, &*self.clock).inspect_err(|_| {
            tracing::warn!(task_id = %task_id, user_id = %author, "acceptance refused");
        })?;
        response.accept(&*self.clock)?;
        self.repository
            .record_acceptance(&task, &response, revision)
            .await
            .inspect_err(|err| warn_on_conflict(err, "acceptance lost a race"))?;
        tracing::info!(
            task_id = %task_id,
            response_id = %response_id,
            executor = %response.responder_id(),
            "response accepted"
        );
        Ok(task)
    }

    /// Closes an in-progress task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskAuthor`] or
    /// [`TaskDomainError::InvalidStatusTransition`].
    pub async fn close_task(&self, task_id: TaskId, author: UserId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let revision = TaskRevision::of(&task);
        task.close(author, &*self.clock)?;
        self.repository.update(&task, revision).await?;
        tracing::info!(task_id = %task_id, "task closed");
        Ok(task)
    }

    /// Lists every response `responder` sent, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn responses_by(&self, responder: UserId) -> TaskLifecycleResult<Vec<Response>> {
        Ok(self.repository.list_by_responder(responder).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn load_pair(
        &self,
        task_id: TaskId,
        response_id: ResponseId,
    ) -> TaskLifecycleResult<(Task, Response)> {
        let task = self.load(task_id).await?;
        let response = self
            .repository
            .find_response(response_id)
            .await?
            .filter(|found| found.task_id() == task_id)
            .ok_or(TaskLifecycleError::ResponseNotFound(response_id))?;
        Ok((task, response))
    }
}

fn warn_on_conflict(err: &TaskRepositoryError, event: &'static str) {
    if let TaskRepositoryError::Conflict(task_id) = err {
        tracing::warn!(task_id = %task_id, "{event}");
    }
}
