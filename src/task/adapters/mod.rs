//! Adapter implementations for task and response ports.

pub mod memory;
pub mod postgres;
