//! Simulation statistics collection and reporting.
//!
//! This module tracks the outcome counters of a run. It provides:
//! 1. **Counters:** Hits, misses and evictions, each monotonically non-decreasing.
//! 2. **Derived metrics:** Total accesses and hit rate.
//! 3. **Reporting:** The one-line summary (`hits:<n> misses:<n> evictions:<n>`) and a JSON form.

use std::fmt;

use serde::Serialize;

use crate::sim::AccessOutcome;

/// Outcome counters for a simulation run.
///
/// Owned by the caller and passed by `&mut` into every access; never shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Accesses whose tag was already resident.
    pub hits: u64,
    /// Accesses that had to fill or replace a line.
    pub misses: u64,
    /// Misses that displaced a valid line.
    pub evictions: u64,
}

impl Stats {
    /// Creates zeroed counters.
    pub const fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Counts one access outcome.
    #[inline]
    pub const fn record(&mut self, outcome: AccessOutcome) {
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::Miss => self.misses += 1,
            AccessOutcome::MissEviction => {
                self.misses += 1;
                self.evictions += 1;
            }
        }
    }

    /// Total simulated accesses (`hits + misses`).
    ///
    /// A modify record counts as two accesses.
    #[inline]
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, or 0.0 before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Renders the counters as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors; plain integer fields never produce one in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Prints the summary line to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}
