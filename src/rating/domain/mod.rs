//! Domain model for ratings.

mod eligibility;
mod error;
mod ids;
mod rating;
mod score;

pub use eligibility::{IneligibleReason, RatingEligibility};
pub use error::RatingDomainError;
pub use ids::RatingId;
pub use rating::{PersistedRatingData, Rating};
pub use score::{RatingComment, Score};
