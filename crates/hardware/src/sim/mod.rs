//! Access simulation.
//!
//! This module turns addresses into cache outcomes. It provides:
//! 1. **Simulator:** The per-address hit/miss/eviction decision and LRU bookkeeping.
//! 2. **Runner:** The trace-driven loop, including `M` = load then store composition and verbose output.

/// Trace-driven simulation loop.
pub mod runner;

/// Single-address access simulation.
pub mod simulator;

use std::fmt;

pub use runner::{run, run_trace};
pub use simulator::{RecordOutcome, Simulator, simulate};

/// Result of one cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessOutcome {
    /// The tag was resident.
    Hit,
    /// The tag was filled into an empty line.
    Miss,
    /// The tag replaced the set's least recently used line.
    MissEviction,
}

impl AccessOutcome {
    /// True for [`AccessOutcome::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
            Self::MissEviction => write!(f, "miss eviction"),
        }
    }
}
