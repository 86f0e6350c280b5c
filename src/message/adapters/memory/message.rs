//! In-memory message log for tests and local tooling.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::account::domain::UserId;
use crate::message::{
    domain::Message,
    error::MessageRepositoryError,
    ports::{MessageRepository, MessageRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory message log, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> MessageRepositoryError {
    MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()> {
        let mut messages = self.messages.write().map_err(lock_error)?;
        if messages.iter().any(|existing| existing.id() == message.id()) {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn find_by_task(&self, task_id: TaskId) -> MessageRepositoryResult<Vec<Message>> {
        let messages = self.messages.read().map_err(lock_error)?;
        let mut found: Vec<Message> = messages
            .iter()
            .filter(|message| message.task_id() == task_id)
            .cloned()
            .collect();
        found.sort_by_key(Message::created_at);
        Ok(found)
    }

    async fn mark_read(&self, task_id: TaskId, reader: UserId) -> MessageRepositoryResult<u64> {
        let mut messages = self.messages.write().map_err(lock_error)?;
        let mut changed = 0_usize;
        for message in messages
            .iter_mut()
            .filter(|message| message.task_id() == task_id && message.is_unread_for(reader))
        {
            message.mark_read();
            changed = changed.saturating_add(1);
        }
        Ok(count(changed))
    }

    async fn count_unread(
        &self,
        task_id: TaskId,
        reader: UserId,
    ) -> MessageRepositoryResult<u64> {
        let messages = self.messages.read().map_err(lock_error)?;
        Ok(count(
            messages
                .iter()
                .filter(|message| message.task_id() == task_id && message.is_unread_for(reader))
                .count(),
        ))
    }
}
