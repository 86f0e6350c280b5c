//! Port contracts for tasks and responses.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{
    AdminTaskFilter, ResponseRepository, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskRevision,
};
