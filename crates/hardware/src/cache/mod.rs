//! Set-Associative Cache Store.
//!
//! This module owns the cache state: `2^s` sets of `E` lines each. A line
//! carries a valid bit, a tag and a recency timestamp; there is no data
//! payload and no dirty bit. The store does not decide hits or victims on its
//! own, it hands out borrowed sets to the access simulator.
//!
//! Storage is released when the [`Cache`] is dropped, so it can only be torn
//! down once.

/// Least-recently-used victim selection over a set's timestamps.
pub mod lru;

use tracing::debug;

use crate::common::{SimError, SimResult};
use crate::config::Geometry;

/// One cache line: validity, tag and recency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Whether the line holds a live block.
    pub valid: bool,
    /// Address tag of the block; meaningless while `valid` is false.
    pub tag: u64,
    /// Logical recency counter; larger means more recently used.
    pub timestamp: u64,
}

impl CacheLine {
    /// Returns true if this line holds `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    /// Fills (or refills) the line with `tag` at the given recency.
    #[inline]
    pub const fn install(&mut self, tag: u64, timestamp: u64) {
        self.valid = true;
        self.tag = tag;
        self.timestamp = timestamp;
    }
}

/// A fixed-size group of `E` lines sharing one set index.
///
/// Slot order only matters for deterministic tie-breaking: the lowest slot
/// wins when choosing an empty line or an LRU victim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    /// Allocates a set of `ways` empty lines.
    fn try_new(ways: usize) -> Option<Self> {
        let mut lines = Vec::new();
        lines.try_reserve_exact(ways).ok()?;
        lines.resize(ways, CacheLine::default());
        Some(Self { lines })
    }

    /// The lines of this set, in slot order.
    #[inline]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Mutable access to the lines of this set.
    #[inline]
    pub fn lines_mut(&mut self) -> &mut [CacheLine] {
        &mut self.lines
    }

    /// Associativity of the set.
    #[inline]
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Slot holding `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(tag))
    }

    /// True when no line in the set is invalid.
    pub fn is_full(&self) -> bool {
        self.lines.iter().all(|line| line.valid)
    }

    /// Number of valid lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }
}

/// The whole cache: `S` sets, exclusively owned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cache {
    sets: Vec<CacheSet>,
    ways: usize,
}

impl Cache {
    /// Allocates a cache for `geometry` with every line empty.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Validated geometry; supplies `S = 2^s` and `E`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for an invalid geometry, or
    /// [`SimError::Allocation`] if the sets or lines cannot be allocated.
    pub fn new(geometry: &Geometry) -> SimResult<Self> {
        geometry.validate()?;
        let num_sets = geometry.num_sets();
        let ways = geometry.lines_per_set;
        let alloc_err = || SimError::Allocation {
            sets: num_sets,
            lines: ways,
        };

        let mut sets = Vec::new();
        sets.try_reserve_exact(num_sets).map_err(|_| alloc_err())?;
        for _ in 0..num_sets {
            sets.push(CacheSet::try_new(ways).ok_or_else(alloc_err)?);
        }

        debug!(sets = num_sets, ways, "allocated cache");
        Ok(Self { sets, ways })
    }

    /// Number of sets.
    #[inline]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Lines per set.
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Borrows set `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_sets()`. Address decomposition never produces
    /// such an index for a valid geometry, so this indicates a bug.
    #[inline]
    pub fn set(&self, index: usize) -> &CacheSet {
        assert!(
            index < self.sets.len(),
            "set index {index} out of range for {} sets",
            self.sets.len()
        );
        &self.sets[index]
    }

    /// Mutably borrows set `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_sets()`.
    #[inline]
    pub fn set_mut(&mut self, index: usize) -> &mut CacheSet {
        assert!(
            index < self.sets.len(),
            "set index {index} out of range for {} sets",
            self.sets.len()
        );
        &mut self.sets[index]
    }

    /// Iterates over all sets in index order.
    pub fn sets(&self) -> impl Iterator<Item = &CacheSet> {
        self.sets.iter()
    }

    /// Number of valid lines across the whole cache.
    pub fn occupancy(&self) -> usize {
        self.sets.iter().map(CacheSet::occupancy).sum()
    }

    /// Invalidates every line and resets all timestamps.
    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.lines_mut().fill(CacheLine::default());
        }
    }
}
