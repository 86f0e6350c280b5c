//! Diesel row models for task persistence.

use super::schema::{task_responses, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query, insert and update row for tasks.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Headline.
    pub title: String,
    /// Body.
    pub description: String,
    /// Author account.
    pub author_id: uuid::Uuid,
    /// Task category.
    pub category_id: uuid::Uuid,
    /// `city` or `remote`.
    pub location_type: String,
    /// City for on-site work.
    pub city_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Moderation status.
    pub moderation_status: String,
    /// Moderator's note.
    pub moderation_comment: Option<String>,
    /// Administrator behind the last decision.
    pub moderated_by: Option<uuid::Uuid>,
    /// Time of the last decision.
    pub moderated_at: Option<DateTime<Utc>>,
    /// Accepted response.
    pub accepted_response_id: Option<uuid::Uuid>,
    /// Responder of the accepted response.
    pub executor_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query, insert and update row for responses.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = task_responses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResponseRow {
    /// Response identifier.
    pub id: uuid::Uuid,
    /// Task responded to.
    pub task_id: uuid::Uuid,
    /// Responding account.
    pub responder_id: uuid::Uuid,
    /// Pitch text.
    pub message: String,
    /// Response status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
