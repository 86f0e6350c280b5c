//! Editorial content: the blog and static pages.
//!
//! Administrators write articles in categories and publish them to the
//! public blog; static pages (terms, about, help) are addressed by slug.
//! Every slug is derived from a title unless given explicitly, and clashes
//! are resolved by appending a counter.
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
