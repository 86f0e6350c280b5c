//! Port contracts for task conversations.

pub mod repository;

pub use repository::{MessageRepository, MessageRepositoryResult};
