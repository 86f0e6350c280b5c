//! Private conversation between a task's author and its executor.
//!
//! A conversation opens once the author accepts a response and stays
//! writable after the task closes. The log is append-only; reading it marks
//! the counterpart's messages as read. Administrators can read any
//! transcript and post system notices into it.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
