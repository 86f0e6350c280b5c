//! `PostgreSQL` repository implementation for the message log.

use super::schema::task_messages;
use crate::account::domain::UserId;
use crate::message::{
    domain::{Message, MessageBody, MessageId, MessageSender, PersistedMessageData},
    error::MessageRepositoryError,
    ports::{MessageRepository, MessageRepositoryResult},
};
use crate::persistence::{PgPool, from_sql_count, run_blocking};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Query and insert row for messages.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct MessageRow {
    id: uuid::Uuid,
    task_id: uuid::Uuid,
    sender_id: Option<uuid::Uuid>,
    body: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// `PostgreSQL`-backed message repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()> {
        let row = to_row(message);
        let message_id = message.id();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(task_messages::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        MessageRepositoryError::DuplicateMessage(message_id)
                    }
                    _ => MessageRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> MessageRepositoryResult<Vec<Message>> {
        run_blocking(&self.pool, move |connection| {
            let rows = task_messages::table
                .filter(task_messages::task_id.eq(task_id.into_inner()))
                .order((task_messages::created_at.asc(), task_messages::id.asc()))
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)
                .map_err(MessageRepositoryError::persistence)?;
            rows.into_iter().map(row_to_message).collect()
        })
        .await
    }

    async fn mark_read(&self, task_id: TaskId, reader: UserId) -> MessageRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let reader_id = reader.into_inner();
            let affected = diesel::update(
                task_messages::table
                    .filter(task_messages::task_id.eq(task_id.into_inner()))
                    .filter(task_messages::is_read.eq(false))
                    .filter(
                        task_messages::sender_id
                            .is_null()
                            .or(task_messages::sender_id.ne(reader_id)),
                    ),
            )
            .set(task_messages::is_read.eq(true))
            .execute(connection)
            .map_err(MessageRepositoryError::persistence)?;
            Ok(u64::try_from(affected).unwrap_or(u64::MAX))
        })
        .await
    }

    async fn count_unread(
        &self,
        task_id: TaskId,
        reader: UserId,
    ) -> MessageRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let reader_id = reader.into_inner();
            let total = task_messages::table
                .filter(task_messages::task_id.eq(task_id.into_inner()))
                .filter(task_messages::is_read.eq(false))
                .filter(
                    task_messages::sender_id
                        .is_null()
                        .or(task_messages::sender_id.ne(reader_id)),
                )
                .count()
                .get_result::<i64>(connection)
                .map_err(MessageRepositoryError::persistence)?;
            Ok(from_sql_count(total))
        })
        .await
    }
}

fn to_row(message: &Message) -> MessageRow {
    MessageRow {
        id: message.id().into_inner(),
        task_id: message.task_id().into_inner(),
        sender_id: message.sender().user_id().map(UserId::into_inner),
        body: message.body().as_str().to_owned(),
        is_read: message.is_read(),
        created_at: message.created_at(),
    }
}

fn row_to_message(row: MessageRow) -> MessageRepositoryResult<Message> {
    let sender = row.sender_id.map_or(MessageSender::System, |id| {
        MessageSender::User {
            user_id: UserId::from_uuid(id),
        }
    });
    Ok(Message::from_persisted(PersistedMessageData {
        id: MessageId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        sender,
        body: MessageBody::new(&row.body).map_err(MessageRepositoryError::persistence)?,
        is_read: row.is_read,
        created_at: row.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::{row_to_message, to_row};
    use crate::account::domain::UserId;
    use crate::message::domain::{Message, MessageBody, MessageSender};
    use crate::task::domain::TaskId;
    use mockable::DefaultClock;
    use rstest::rstest;

    #[rstest]
    fn system_notice_is_stored_without_sender() {
        let notice = Message::system(
            TaskId::new(),
            MessageBody::new("Task reopened by support").expect("valid body"),
            &DefaultClock,
        );
        let row = to_row(&notice);
        assert!(row.sender_id.is_none());

        let restored = row_to_message(row).expect("row converts");
        assert_eq!(restored.sender(), MessageSender::System);
        assert_eq!(restored, notice);
    }

    #[rstest]
    fn user_message_keeps_sender_and_read_flag() {
        let sender = UserId::new();
        let mut message = Message::from_user(
            TaskId::new(),
            sender,
            MessageBody::new("On my way").expect("valid body"),
            &DefaultClock,
        );
        message.mark_read();

        let restored = row_to_message(to_row(&message)).expect("row converts");
        assert_eq!(restored.sender().user_id(), Some(sender));
        assert!(restored.is_read());
    }
}
