//! `PostgreSQL` adapter for categories and cities.

mod repository;
mod schema;

pub use repository::PostgresCatalogRepository;
