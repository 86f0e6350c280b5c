//! Error types for account validation and parsing.

use super::{UserId, WarningId};
use thiserror::Error;

/// Errors returned while constructing or mutating accounts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The username breaks the length or character rules.
    #[error("invalid username '{0}', expected 3-30 characters of [a-zA-Z0-9_-]")]
    InvalidUsername(String),

    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// A profile field exceeds its maximum length.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
    },

    /// A moderation reason is empty after trimming.
    #[error("a reason is required")]
    EmptyReason,

    /// The ban duration lies outside 1..=365 days.
    #[error("ban duration must be between 1 and 365 days, got {0}")]
    InvalidBanDays(i64),

    /// Administrators cannot be banned.
    #[error("user {0} is an administrator and cannot be banned")]
    CannotBanAdmin(UserId),

    /// The warning does not belong to the user.
    #[error("warning {0} not found")]
    WarningNotFound(WarningId),
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing genders from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown gender: {0}")]
pub struct ParseGenderError(pub String);

/// Error returned while parsing ban statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ban status: {0}")]
pub struct ParseBanStatusError(pub String);
