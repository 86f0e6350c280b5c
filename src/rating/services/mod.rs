//! Application services for ratings.

mod rating;

pub use rating::{RateUserRequest, RatingError, RatingResult, RatingService, UserRatings};
