//! Password hashing port.

use crate::account::domain::PasswordHash;
use thiserror::Error;

/// Failure reported by a hashing backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

/// One-way password hashing.
///
/// Deployments plug in a bcrypt or argon2 backend; the services never see
/// plaintext beyond handing it to this port.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the backend fails.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Checks a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the stored hash is unreadable.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
