//! In-memory adapters for conversations.

mod message;

pub use message::InMemoryMessageRepository;
