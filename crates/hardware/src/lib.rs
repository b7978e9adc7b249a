//! Set-associative cache simulator library.
//!
//! This crate replays memory traces against a parameterized cache and counts
//! hits, misses and evictions under LRU replacement. It provides:
//! 1. **Cache store:** Sets of lines with valid bits, tags and recency timestamps.
//! 2. **Access simulation:** Tag/set decomposition, hit detection, fill and LRU eviction.
//! 3. **Trace input:** A reader for valgrind-style `I`/`L`/`S`/`M` traces.
//! 4. **Configuration and statistics:** Validated geometry and the run summary.
//!
//! Memory contents, write policies and multi-level hierarchies are not modeled.

/// Common types (addresses, errors).
pub mod common;
/// Cache geometry and run configuration.
pub mod config;
/// Cache store (lines, sets, LRU scan).
pub mod cache;
/// Access simulator and trace replay loop.
pub mod sim;
/// Hit/miss/eviction counters and summary output.
pub mod stats;
/// Trace file parsing.
pub mod trace;

/// Cache store; build one with `Cache::new`.
pub use crate::cache::Cache;
/// Validated cache geometry.
pub use crate::config::{Geometry, SimConfig};
/// Single-access entry point and the owning simulator.
pub use crate::sim::{AccessOutcome, Simulator, simulate};
/// Run counters.
pub use crate::stats::Stats;
