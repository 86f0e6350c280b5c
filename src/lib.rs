//! Taskboard: core of a local task marketplace.
//!
//! Users post tasks, others respond with offers, the author picks one
//! executor, the pair talk in a per-task thread and rate each other once the
//! task closes. Administrators moderate tasks and users and curate the
//! catalog and editorial content.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and hashing
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Use-case orchestration over the ports
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, moderation gate and responses
//! - [`message`]: Per-task conversation between author and executor
//! - [`rating`]: Post-completion ratings and reputation summaries
//! - [`account`]: Users, credentials, roles and bans
//! - [`access`]: Session and administrator gates
//! - [`catalog`]: Task categories, cities and regions
//! - [`content`]: Blog articles and static pages

pub mod access;
pub mod account;
pub mod catalog;
pub mod config;
pub mod content;
mod ids;
pub mod message;
pub mod pagination;
pub mod persistence;
pub mod rating;
pub mod slug;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
