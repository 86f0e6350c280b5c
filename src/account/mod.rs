//! Marketplace accounts.
//!
//! Registration, login, profiles and the user moderation record (warnings
//! and bans). Rating totals live on the account but are written by the
//! rating ledger. The module follows the hexagonal layout:
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
