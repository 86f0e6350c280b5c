//! Adapter implementations for rating ports.

pub mod memory;
pub mod postgres;
