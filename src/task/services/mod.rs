//! Application services for the task lifecycle and its moderation gate.

mod lifecycle;
mod moderation;

pub use lifecycle::{
    CreateTaskRequest, EditTaskRequest, TaskDetail, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
pub use moderation::{
    ModeratedTask, TaskModerationError, TaskModerationResult, TaskModerationService,
};
