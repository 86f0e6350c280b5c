//! In-memory content adapter.

mod content;

pub use content::InMemoryContentRepository;
