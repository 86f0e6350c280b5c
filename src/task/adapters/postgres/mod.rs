//! `PostgreSQL` adapters for task and response persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
