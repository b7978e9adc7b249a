//! Common types shared across the cache simulator.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Addresses:** A strong address type and its tag/set/offset decomposition.
//! 2. **Error Handling:** Configuration and run error types.

/// Address type and decomposition into cache fields.
pub mod addr;

/// Error types for configuration and simulation runs.
pub mod error;

pub use addr::{Address, DecodedAddr};
pub use error::{ConfigError, SimError, SimResult};
