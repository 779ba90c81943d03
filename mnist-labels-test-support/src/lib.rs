//! Shared test utilities used across mnist-labels crates.

pub mod idx;
pub mod tracing;
