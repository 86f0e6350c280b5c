//! In-memory task and response store for tests and local tooling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::account::domain::UserId;
use crate::pagination::{Page, PageRequest};
use crate::task::{
    domain::{PersistedResponseData, Response, ResponseId, ResponseStatus, Task, TaskId},
    ports::{
        AdminTaskFilter, ResponseRepository, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult, TaskRevision,
    },
};

/// Thread-safe in-memory store implementing both task ports.
///
/// Tasks and responses share one lock so acceptances stay atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    responses: HashMap<ResponseId, Response>,
}

impl InMemoryTaskState {
    fn sorted_tasks(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut matching: Vec<Task> = self.tasks.values().filter(|t| keep(t)).cloned().collect();
        matching.sort_by(|a, b| newest_first(a.created_at(), b.created_at(), a.id(), b.id()));
        matching
    }

    fn sorted_responses(&self, keep: impl Fn(&Response) -> bool) -> Vec<Response> {
        let mut matching: Vec<Response> = self
            .responses
            .values()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| newest_first(a.created_at(), b.created_at(), a.id(), b.id()));
        matching
    }

    fn ensure_revision(&self, task_id: TaskId, expected: TaskRevision) -> TaskRepositoryResult<()> {
        let stored = self
            .tasks
            .get(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        if !expected.matches(stored) {
            return Err(TaskRepositoryError::Conflict(task_id));
        }
        Ok(())
    }
}

fn newest_first<I: Ord>(
    a_at: DateTime<Utc>,
    b_at: DateTime<Utc>,
    a_id: I,
    b_id: I,
) -> Ordering {
    b_at.cmp(&a_at).then_with(|| a_id.cmp(&b_id))
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected: TaskRevision) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.ensure_revision(task.id(), expected)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_open_approved(&self, page: PageRequest) -> TaskRepositoryResult<Page<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let matching = state.sorted_tasks(|task| {
            task.is_publicly_visible() && task.ensure_open().is_ok()
        });
        Ok(page.slice(matching))
    }

    async fn list_by_author(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let matching = state.sorted_tasks(|task| task.is_author(author));
        Ok(page.slice(matching))
    }

    async fn list(
        &self,
        filter: AdminTaskFilter,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let matching = state.sorted_tasks(|task| filter.matches(task));
        Ok(page.slice(matching))
    }
}

#[async_trait]
impl ResponseRepository for InMemoryTaskRepository {
    async fn store_response(&self, response: &Response) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let duplicate = state.responses.values().any(|existing| {
            existing.task_id() == response.task_id()
                && existing.responder_id() == response.responder_id()
        });
        if duplicate || state.responses.contains_key(&response.id()) {
            return Err(TaskRepositoryError::DuplicateResponse {
                task_id: response.task_id(),
                responder: response.responder_id(),
            });
        }
        state.responses.insert(response.id(), response.clone());
        Ok(())
    }

    async fn update_response(&self, response: &Response) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.responses.contains_key(&response.id()) {
            return Err(TaskRepositoryError::ResponseNotFound(response.id()));
        }
        state.responses.insert(response.id(), response.clone());
        Ok(())
    }

    async fn delete_response(&self, id: ResponseId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .responses
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::ResponseNotFound(id))
    }

    async fn find_response(&self, id: ResponseId) -> TaskRepositoryResult<Option<Response>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.responses.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Response>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.sorted_responses(|response| response.task_id() == task_id))
    }

    async fn find_by_task_and_responder(
        &self,
        task_id: TaskId,
        responder: UserId,
    ) -> TaskRepositoryResult<Option<Response>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .responses
            .values()
            .find(|response| response.task_id() == task_id && response.responder_id() == responder)
            .cloned())
    }

    async fn list_by_responder(&self, responder: UserId) -> TaskRepositoryResult<Vec<Response>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.sorted_responses(|response| response.responder_id() == responder))
    }

    async fn record_acceptance(
        &self,
        task: &Task,
        response: &Response,
        expected: TaskRevision,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.ensure_revision(task.id(), expected)?;
        let stored_response = state
            .responses
            .get(&response.id())
            .ok_or(TaskRepositoryError::ResponseNotFound(response.id()))?;
        if stored_response.status() != ResponseStatus::Pending {
            return Err(TaskRepositoryError::Conflict(task.id()));
        }
        let rejected_at = task.updated_at();
        let others: Vec<Response> = state
            .responses
            .values()
            .filter(|other| {
                other.task_id() == task.id()
                    && other.id() != response.id()
                    && other.status() == ResponseStatus::Pending
            })
            .map(|other| reject(other, rejected_at))
            .collect();
        for other in others {
            state.responses.insert(other.id(), other);
        }
        state.responses.insert(response.id(), response.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }
}

fn reject(response: &Response, at: DateTime<Utc>) -> Response {
    Response::from_persisted(PersistedResponseData {
        id: response.id(),
        task_id: response.task_id(),
        responder_id: response.responder_id(),
        message: response.message().clone(),
        status: ResponseStatus::Rejected,
        created_at: response.created_at(),
        updated_at: at,
    })
}
