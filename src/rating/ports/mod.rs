//! Port contracts for ratings.

pub mod repository;

pub use repository::{
    RatingRepository, RatingRepositoryError, RatingRepositoryResult, RatingTotals,
};
