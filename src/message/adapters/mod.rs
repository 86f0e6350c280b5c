//! Adapter implementations for message ports.

pub mod memory;
pub mod postgres;
