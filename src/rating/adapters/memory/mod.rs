//! In-memory adapters for ratings.

mod rating;

pub use rating::InMemoryRatingRepository;
