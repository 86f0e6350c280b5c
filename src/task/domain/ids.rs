//! Identifier types for the task domain.

use crate::ids::uuid_id;

uuid_id! {
    /// Unique identifier for a posted task.
    TaskId
}

uuid_id! {
    /// Unique identifier for a response to a task.
    ResponseId
}
