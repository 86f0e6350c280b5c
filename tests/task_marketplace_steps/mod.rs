//! Step definitions for task marketplace scenarios.

mod given;
mod then;
mod when;
pub mod world;
