//! Identifier types for the catalog domain.

use crate::ids::uuid_id;

uuid_id! {
    /// Unique identifier for a task category.
    CategoryId
}

uuid_id! {
    /// Unique identifier for a city.
    CityId
}
