//! Reference data tasks point at: categories, cities and regions.
//!
//! Administrators curate categories and cities; the region list is a static
//! file loaded once at start-up.
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
