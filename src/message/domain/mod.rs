//! Domain model for task conversations.

mod body;
mod ids;
mod message;

pub use body::MessageBody;
pub use ids::MessageId;
pub use message::{Message, MessageSender, PersistedMessageData};
