//! Response entity: a user's offer to carry out a task.

use super::{ResponseId, ResponseMessage, ResponseStatus, TaskDomainError, TaskId};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A user's offer to carry out a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    id: ResponseId,
    task_id: TaskId,
    responder_id: UserId,
    message: ResponseMessage,
    status: ResponseStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedResponseData {
    /// Persisted response identifier.
    pub id: ResponseId,
    /// Task the response belongs to.
    pub task_id: TaskId,
    /// Responding user.
    pub responder_id: UserId,
    /// Persisted message.
    pub message: ResponseMessage,
    /// Persisted status.
    pub status: ResponseStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Response {
    /// Creates a pending response.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        responder_id: UserId,
        message: ResponseMessage,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ResponseId::new(),
            task_id,
            responder_id,
            message,
            status: ResponseStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a response from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedResponseData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            responder_id: data.responder_id,
            message: data.message,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the response identifier.
    #[must_use]
    pub const fn id(&self) -> ResponseId {
        self.id
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the responding user.
    #[must_use]
    pub const fn responder_id(&self) -> UserId {
        self.responder_id
    }

    /// Returns the message.
    #[must_use]
    pub const fn message(&self) -> &ResponseMessage {
        &self.message
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks that `user` wrote this response.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotResponder`] otherwise.
    pub fn ensure_responder(&self, user: UserId) -> Result<(), TaskDomainError> {
        if self.responder_id != user {
            return Err(TaskDomainError::NotResponder(self.id));
        }
        Ok(())
    }

    /// Replaces the message of a pending response.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotResponder`] or
    /// [`TaskDomainError::ResponseNotPending`].
    pub fn edit(
        &mut self,
        editor: UserId,
        message: ResponseMessage,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_responder(editor)?;
        self.ensure_pending()?;
        self.message = message;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Marks the response as chosen by the author.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ResponseNotPending`] for decided responses.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_pending()?;
        self.status = ResponseStatus::Accepted;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Checks that the author has not decided on this response yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ResponseNotPending`] otherwise.
    pub const fn ensure_pending(&self) -> Result<(), TaskDomainError> {
        match self.status {
            ResponseStatus::Pending => Ok(()),
            ResponseStatus::Accepted | ResponseStatus::Rejected => {
                Err(TaskDomainError::ResponseNotPending(self.id))
            }
        }
    }
}
