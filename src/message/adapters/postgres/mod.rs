//! `PostgreSQL` adapter for the message log.

mod repository;
mod schema;

pub use repository::PostgresMessageRepository;
