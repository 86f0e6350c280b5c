//! Ratings participants leave each other once a task closes.
//!
//! Each participant of a closed task may rate the other exactly once. Every
//! stored rating refreshes the rated user's denormalized
//! [`RatingSummary`](crate::account::domain::RatingSummary).
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
