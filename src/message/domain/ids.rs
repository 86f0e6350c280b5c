//! Identifier types for the message domain.

use crate::ids::uuid_id;

uuid_id! {
    /// Unique identifier for a conversation message.
    MessageId
}
