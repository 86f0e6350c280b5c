//! In-memory adapters for tasks and responses.

mod task;

pub use task::InMemoryTaskRepository;
