//! Error types for task domain validation and parsing.

use super::{ResponseId, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating tasks and responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field exceeds its maximum length.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
    },

    /// The location type is neither `city` nor `remote`.
    #[error("unknown location type '{0}', expected 'city' or 'remote'")]
    InvalidLocationType(String),

    /// A city location was requested without a city.
    #[error("a city is required when the location type is 'city'")]
    CityRequired,

    /// The requested lifecycle transition is not allowed.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The acting user is not the task author.
    #[error("only the author may change task {0}")]
    NotTaskAuthor(TaskId),

    /// The acting user did not write the response.
    #[error("only the responder may change response {0}")]
    NotResponder(ResponseId),

    /// The response belongs to a different task.
    #[error("response {response_id} does not belong to task {task_id}")]
    ResponseTaskMismatch {
        /// Task named by the caller.
        task_id: TaskId,
        /// Response named by the caller.
        response_id: ResponseId,
    },

    /// Authors cannot respond to their own tasks.
    #[error("authors cannot respond to their own task {0}")]
    OwnTask(TaskId),

    /// The task no longer accepts changes of this kind.
    #[error("task {0} is not open")]
    TaskNotOpen(TaskId),

    /// The task has not passed moderation.
    #[error("task {0} is not approved")]
    TaskNotApproved(TaskId),

    /// The response has already been accepted or rejected.
    #[error("response {0} is no longer pending")]
    ResponseNotPending(ResponseId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing moderation statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown moderation status: {0}")]
pub struct ParseModerationStatusError(pub String);

/// Error returned while parsing response statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown response status: {0}")]
pub struct ParseResponseStatusError(pub String);
