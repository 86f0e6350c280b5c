//! Posted tasks, the responses they attract and their moderation.
//!
//! Authors post tasks, administrators approve them for public view, other
//! users respond, and the author accepts one response to start the work.
//! The module follows hexagonal architecture:
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
