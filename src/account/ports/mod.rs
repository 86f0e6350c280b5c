//! Port contracts for accounts.

pub mod hasher;
pub mod repository;

pub use hasher::{PasswordHashError, PasswordHasher};
pub use repository::{UserFilter, UserRepository, UserRepositoryError, UserRepositoryResult};

#[cfg(test)]
pub use hasher::MockPasswordHasher;
