//! Application services for task conversations.

mod messaging;

pub use messaging::{Conversation, MessagingError, MessagingResult, MessagingService};
