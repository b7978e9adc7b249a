//! Simulator: decides the outcome of each access and updates cache state.
//!
//! [`simulate`] is the core step. It borrows the cache mutably, reads the
//! geometry, and bumps the caller's counters; nothing is copied in and out.
//! [`Simulator`] keeps those three values side by side for callers that do
//! not need to own them separately.

use tracing::trace;

use super::AccessOutcome;
use crate::cache::{Cache, lru};
use crate::common::{Address, SimResult};
use crate::config::Geometry;
use crate::stats::Stats;
use crate::trace::{Operation, TraceRecord};

/// Simulates one access to `address`.
///
/// On a hit the matching line becomes the set's most recently used. On a
/// miss the first empty line is filled, or, if the set is full, the least
/// recently used line is replaced and an eviction is counted. Either way the
/// installed line is stamped `MRU + 1`.
///
/// # Arguments
///
/// * `cache` - Cache state to read and update.
/// * `geometry` - Geometry the cache was built with.
/// * `stats` - Counters to update.
/// * `address` - Byte address being accessed.
///
/// # Returns
///
/// The outcome of the access, which has already been counted in `stats`.
///
/// # Panics
///
/// Panics if `cache` was built for fewer sets than `geometry` describes.
pub fn simulate(
    cache: &mut Cache,
    geometry: &Geometry,
    stats: &mut Stats,
    address: Address,
) -> AccessOutcome {
    let decoded = address.decode(geometry);
    let lines = cache.set_mut(decoded.set_index).lines_mut();

    // One pass over the whole set: occupancy must reflect every slot, not
    // just the slots before a hit.
    let mut hit_slot = None;
    let mut full = true;
    for (slot, line) in lines.iter().enumerate() {
        if !line.valid {
            full = false;
        } else if line.tag == decoded.tag && hit_slot.is_none() {
            hit_slot = Some(slot);
        }
    }

    let outcome = if let Some(slot) = hit_slot {
        let next = lru::mru_timestamp(lines) + 1;
        lines[slot].timestamp = next;
        AccessOutcome::Hit
    } else {
        let scan = lru::scan(lines);
        let empty = if full { None } else { lru::first_invalid(lines) };
        match empty {
            Some(slot) => {
                lines[slot].install(decoded.tag, scan.next_timestamp());
                AccessOutcome::Miss
            }
            None => {
                lines[scan.victim].install(decoded.tag, scan.next_timestamp());
                AccessOutcome::MissEviction
            }
        }
    };

    stats.record(outcome);
    trace!(
        address = format_args!("{address:#x}"),
        set = decoded.set_index,
        tag = format_args!("{:#x}", decoded.tag),
        %outcome,
        "access"
    );
    outcome
}

/// Outcomes of one trace record: zero, one or two accesses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    outcomes: [Option<AccessOutcome>; 2],
}

impl RecordOutcome {
    fn push(&mut self, outcome: AccessOutcome) {
        if let Some(slot) = self.outcomes.iter_mut().find(|o| o.is_none()) {
            *slot = Some(outcome);
        }
    }

    /// The access outcomes in order.
    pub fn iter(&self) -> impl Iterator<Item = AccessOutcome> {
        self.outcomes.iter().flatten().copied()
    }

    /// Number of accesses performed.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True if the record performed no access (instruction fetch).
    pub fn is_empty(&self) -> bool {
        self.outcomes[0].is_none()
    }
}

/// Cache state, geometry and counters for one run.
#[derive(Debug)]
pub struct Simulator {
    /// Cache contents.
    pub cache: Cache,
    /// Geometry the cache was built with.
    pub geometry: Geometry,
    /// Running counters.
    pub stats: Stats,
}

impl Simulator {
    /// Creates a simulator with a cold cache and zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry is invalid or the cache cannot be allocated.
    pub fn new(geometry: Geometry) -> SimResult<Self> {
        Ok(Self {
            cache: Cache::new(&geometry)?,
            geometry,
            stats: Stats::default(),
        })
    }

    /// Simulates a single access.
    pub fn access(&mut self, address: Address) -> AccessOutcome {
        simulate(&mut self.cache, &self.geometry, &mut self.stats, address)
    }

    /// Simulates a trace record.
    ///
    /// Loads and stores access once; a modify accesses the same address twice,
    /// so its second access always hits. Instruction fetches are ignored.
    pub fn apply(&mut self, record: &TraceRecord) -> RecordOutcome {
        let mut result = RecordOutcome::default();
        match record.op {
            Operation::Instruction => {}
            Operation::Load | Operation::Store => result.push(self.access(record.address)),
            Operation::Modify => {
                result.push(self.access(record.address));
                result.push(self.access(record.address));
            }
        }
        result
    }

    /// Invalidates the cache and zeroes the counters.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.stats = Stats::default();
    }
}
