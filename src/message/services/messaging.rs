//! Participant and administrator access to task conversations.

use crate::access::AdminActor;
use crate::account::domain::UserId;
use crate::message::{
    domain::{Message, MessageBody},
    error::{MessageBodyError, MessageRepositoryError},
    ports::MessageRepository,
};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// A participant's view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Title of the task.
    pub task_title: String,
    /// Lifecycle status of the task.
    pub task_status: TaskStatus,
    /// Whether the viewer wrote the task.
    pub is_author: bool,
    /// Whether the viewer is the executor.
    pub is_executor: bool,
    /// Messages, oldest first, with read flags as they were before this
    /// view.
    pub messages: Vec<Message>,
}

/// Service-level errors for conversations.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The message body is invalid.
    #[error(transparent)]
    Body(#[from] MessageBodyError),

    /// Message repository operation failed.
    #[error(transparent)]
    Repository(#[from] MessageRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The user is neither the author nor the executor.
    #[error("only task participants may use the conversation")]
    Forbidden,

    /// Work on the task has not started yet.
    #[error("task {0} has no conversation until a response is accepted")]
    NotStarted(TaskId),
}

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Conversation service shared by participants and administrators.
#[derive(Clone)]
pub struct MessagingService<T, M, C>
where
    T: TaskRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    messages: Arc<M>,
    clock: Arc<C>,
}

impl<T, M, C> MessagingService<T, M, C>
where
    T: TaskRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new messaging service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, messages: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            messages,
            clock,
        }
    }

    /// Loads the conversation and marks the counterpart's messages as read.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::Forbidden`] for non-participants.
    pub async fn conversation(
        &self,
        task_id: TaskId,
        viewer: UserId,
    ) -> MessagingResult<Conversation> {
        let task = self.participant_task(task_id, viewer).await?;
        let messages = self.messages.find_by_task(task_id).await?;
        let marked = self.messages.mark_read(task_id, viewer).await?;
        tracing::debug!(task_id = %task_id, user_id = %viewer, marked, "conversation read");
        Ok(Conversation {
            task_title: task.title().as_str().to_owned(),
            task_status: task.status(),
            is_author: task.is_author(viewer),
            is_executor: task.is_executor(viewer),
            messages,
        })
    }

    /// Appends a participant's message.
    ///
    /// Allowed while the task is in progress and after it closes.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::Body`] for invalid text,
    /// [`MessagingError::Forbidden`] for non-participants and
    /// [`MessagingError::NotStarted`] for open tasks.
    pub async fn send(
        &self,
        task_id: TaskId,
        sender: UserId,
        text: &str,
    ) -> MessagingResult<Message> {
        let body = MessageBody::new(text)?;
        let task = self.participant_task(task_id, sender).await?;
        if task.status() == TaskStatus::Open {
            tracing::warn!(task_id = %task_id, user_id = %sender, "message to open task refused");
            return Err(MessagingError::NotStarted(task_id));
        }
        let message = Message::from_user(task_id, sender, body, &*self.clock);
        self.messages.store(&message).await?;
        tracing::info!(task_id = %task_id, message_id = %message.id(), "message sent");
        Ok(message)
    }

    /// Counts messages `viewer` has not read yet.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::Forbidden`] for non-participants.
    pub async fn unread_count(&self, task_id: TaskId, viewer: UserId) -> MessagingResult<u64> {
        self.participant_task(task_id, viewer).await?;
        Ok(self.messages.count_unread(task_id, viewer).await?)
    }

    /// Appends a system notice to a task's conversation.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::Body`] for invalid text and
    /// [`MessagingError::TaskNotFound`] for unknown tasks.
    pub async fn post_system_notice(
        &self,
        admin: &AdminActor,
        task_id: TaskId,
        text: &str,
    ) -> MessagingResult<Message> {
        let body = MessageBody::new(text)?;
        self.load(task_id).await?;
        let message = Message::system(task_id, body, &*self.clock);
        self.messages.store(&message).await?;
        tracing::info!(
            task_id = %task_id,
            message_id = %message.id(),
            moderator = %admin.user_id(),
            "system notice posted"
        );
        Ok(message)
    }

    /// Returns the full log for administrators without touching read flags.
    ///
    /// Tasks without an executor have no conversation and yield an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::TaskNotFound`] for unknown tasks.
    pub async fn transcript(
        &self,
        _admin: &AdminActor,
        task_id: TaskId,
    ) -> MessagingResult<Vec<Message>> {
        let task = self.load(task_id).await?;
        if task.executor_id().is_none() {
            return Ok(Vec::new());
        }
        Ok(self.messages.find_by_task(task_id).await?)
    }

    async fn participant_task(&self, task_id: TaskId, user: UserId) -> MessagingResult<Task> {
        let task = self.load(task_id).await?;
        if !task.is_participant(user) {
            tracing::warn!(task_id = %task_id, user_id = %user, "conversation access refused");
            return Err(MessagingError::Forbidden);
        }
        Ok(task)
    }

    async fn load(&self, task_id: TaskId) -> MessagingResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(MessagingError::TaskNotFound(task_id))
    }
}
