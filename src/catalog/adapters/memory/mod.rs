//! In-memory catalog adapter.

mod catalog;

pub use catalog::InMemoryCatalogRepository;
