//! Conversation message entity.

use super::{MessageBody, MessageId};
use crate::account::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageSender {
    /// A task participant.
    User {
        /// Sending user.
        user_id: UserId,
    },
    /// A notice posted by the platform.
    System,
}

impl MessageSender {
    /// Returns the sending user, if any.
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        match self {
            Self::User { user_id } => Some(user_id),
            Self::System => None,
        }
    }
}

/// One entry in a task's conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    task_id: TaskId,
    sender: MessageSender,
    body: MessageBody,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Conversation's task.
    pub task_id: TaskId,
    /// Persisted sender.
    pub sender: MessageSender,
    /// Persisted text.
    pub body: MessageBody,
    /// Whether the recipient has seen it.
    pub is_read: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates an unread message from a participant.
    #[must_use]
    pub fn from_user(
        task_id: TaskId,
        sender: UserId,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Self {
        Self::unread(task_id, MessageSender::User { user_id: sender }, body, clock)
    }

    /// Creates an unread system notice.
    #[must_use]
    pub fn system(task_id: TaskId, body: MessageBody, clock: &impl Clock) -> Self {
        Self::unread(task_id, MessageSender::System, body, clock)
    }

    fn unread(
        task_id: TaskId,
        sender: MessageSender,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            task_id,
            sender,
            body,
            is_read: false,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            sender: data.sender,
            body: data.body,
            is_read: data.is_read,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the conversation's task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender(&self) -> MessageSender {
        self.sender
    }

    /// Returns the text.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns `true` once the recipient has seen the message.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` for platform notices.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self.sender, MessageSender::System)
    }

    /// Returns `true` when `reader` has yet to see this message.
    ///
    /// System notices count as unread for both participants.
    #[must_use]
    pub fn is_unread_for(&self, reader: UserId) -> bool {
        !self.is_read && self.sender.user_id() != Some(reader)
    }

    /// Marks the message as seen.
    pub const fn mark_read(&mut self) {
        self.is_read = true;
    }
}
