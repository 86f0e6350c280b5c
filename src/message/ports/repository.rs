//! Repository port for the append-only message log.

use crate::account::domain::UserId;
use crate::message::{domain::Message, error::MessageRepositoryError};
use crate::task::domain::TaskId;
use async_trait::async_trait;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Message persistence contract.
///
/// Messages are never edited or deleted; only the read flag changes.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the
    /// identifier already exists.
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()>;

    /// Returns a task's messages, oldest first.
    async fn find_by_task(&self, task_id: TaskId) -> MessageRepositoryResult<Vec<Message>>;

    /// Marks every unread message in the task not sent by `reader` as read.
    ///
    /// Returns the number of messages changed.
    async fn mark_read(&self, task_id: TaskId, reader: UserId) -> MessageRepositoryResult<u64>;

    /// Counts the task's messages `reader` has not seen.
    async fn count_unread(&self, task_id: TaskId, reader: UserId)
    -> MessageRepositoryResult<u64>;
}
