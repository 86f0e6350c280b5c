//! Identifier types for the rating domain.

use crate::ids::uuid_id;

uuid_id! {
    /// Unique identifier for a rating.
    RatingId
}
