//! Adapter implementations for account ports.

pub mod memory;
pub mod postgres;
