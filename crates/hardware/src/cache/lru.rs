//! Least Recently Used (LRU) Victim Selection.
//!
//! Recency is tracked with a per-line timestamp rather than a usage stack.
//! A set's most recently used line carries the largest timestamp; every
//! touch or fill stamps the line with `MRU + 1`, which keeps the order within
//! a set strict for as long as the `u64` counter lasts.
//!
//! # Performance
//!
//! - `scan()`: O(E), one pass over the set.
//! - No per-set auxiliary state beyond the lines themselves.

use super::CacheLine;

/// Result of one pass over a set's timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LruScan {
    /// Slot with the smallest timestamp; lowest slot wins ties.
    pub victim: usize,
    /// Smallest timestamp in the set.
    pub lru: u64,
    /// Largest timestamp in the set.
    pub mru: u64,
}

impl LruScan {
    /// Timestamp to give the next line that becomes most recently used.
    #[inline]
    pub const fn next_timestamp(&self) -> u64 {
        self.mru + 1
    }
}

/// Finds the LRU victim and the MRU timestamp of `lines`.
///
/// Invalid lines take part with their stored timestamp, exactly like valid
/// ones.
///
/// # Panics
///
/// Panics if `lines` is empty. A validated geometry has at least one line per set.
pub fn scan(lines: &[CacheLine]) -> LruScan {
    let Some((first, rest)) = lines.split_first() else {
        panic!("LRU scan over an empty set");
    };
    let mut result = LruScan {
        victim: 0,
        lru: first.timestamp,
        mru: first.timestamp,
    };

    for (i, line) in rest.iter().enumerate() {
        // Strict comparison keeps the earliest slot on ties.
        if line.timestamp < result.lru {
            result.lru = line.timestamp;
            result.victim = i + 1;
        }
        if line.timestamp > result.mru {
            result.mru = line.timestamp;
        }
    }
    result
}

/// Largest timestamp in `lines`, or 0 for an empty slice.
#[inline]
pub fn mru_timestamp(lines: &[CacheLine]) -> u64 {
    lines.iter().map(|line| line.timestamp).max().unwrap_or(0)
}

/// Lowest slot whose line is invalid.
#[inline]
pub fn first_invalid(lines: &[CacheLine]) -> Option<usize> {
    lines.iter().position(|line| !line.valid)
}
