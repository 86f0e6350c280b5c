//! Domain model for posted tasks and the responses they attract.
//!
//! A task moves linearly from open to in progress to closed, while a
//! separate moderation status decides whether the public can see it.
//! Infrastructure concerns stay outside of this boundary.

mod error;
mod ids;
mod response;
mod status;
mod task;
mod text;

pub use error::{
    ParseModerationStatusError, ParseResponseStatusError, ParseTaskStatusError, TaskDomainError,
};
pub use ids::{ResponseId, TaskId};
pub use response::{PersistedResponseData, Response};
pub use status::{ModerationStatus, ResponseStatus, TaskStatus};
pub use task::{Moderation, PersistedTaskData, Task, TaskContent, TaskLocation};
pub use text::{ModerationComment, ResponseMessage, TaskDescription, TaskTitle};
