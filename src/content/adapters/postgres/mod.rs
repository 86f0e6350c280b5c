//! `PostgreSQL` adapter for editorial content.

mod models;
mod repository;
mod schema;

pub use repository::PostgresContentRepository;
