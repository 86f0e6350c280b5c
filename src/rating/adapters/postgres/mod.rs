//! `PostgreSQL` adapter for ratings.

mod repository;
mod schema;

pub use repository::PostgresRatingRepository;
