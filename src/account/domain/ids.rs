//! Identifier types for the account domain.

use crate::ids::uuid_id;

uuid_id! {
    /// Unique identifier for a registered user.
    UserId
}

uuid_id! {
    /// Unique identifier for a moderation warning.
    WarningId
}
