//! In-memory adapters for accounts.

mod user;

pub use user::InMemoryUserRepository;
