//! Randomized Simulator Properties.
//!
//! Drives random geometries and address streams through the simulator and
//! checks the counter invariants, the no-duplicate-tag invariant, and exact
//! agreement with a recency-list LRU model.

use std::collections::HashSet;

use csim_core::common::Address;
use csim_core::config::Geometry;
use csim_core::sim::{AccessOutcome, Simulator};
use proptest::prelude::*;

use crate::common::reference::ReferenceLru;

fn small_geometry() -> impl Strategy<Value = Geometry> {
    (0u32..4, 1usize..5, 0u32..4)
        .prop_map(|(s, e, b)| Geometry::new(s, e, b).unwrap())
}

/// Addresses drawn from a narrow range so that sets actually conflict.
fn addresses() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..512, 0..200)
}

proptest! {
    #[test]
    fn counters_are_consistent(geometry in small_geometry(), addrs in addresses()) {
        let mut sim = Simulator::new(geometry).unwrap();
        let mut previous = sim.stats;
        for &a in &addrs {
            let _ = sim.access(Address::new(a));
            prop_assert!(sim.stats.hits >= previous.hits);
            prop_assert!(sim.stats.misses >= previous.misses);
            prop_assert!(sim.stats.evictions >= previous.evictions);
            previous = sim.stats;
        }
        prop_assert_eq!(sim.stats.accesses(), addrs.len() as u64);
        prop_assert!(sim.stats.evictions <= sim.stats.misses);
    }

    #[test]
    fn sets_never_hold_duplicate_tags(geometry in small_geometry(), addrs in addresses()) {
        let mut sim = Simulator::new(geometry).unwrap();
        for &a in &addrs {
            let _ = sim.access(Address::new(a));
        }
        for set in sim.cache.sets() {
            let mut seen = HashSet::new();
            for line in set.lines().iter().filter(|l| l.valid) {
                prop_assert!(seen.insert(line.tag), "duplicate tag {:#x}", line.tag);
            }
        }
    }

    /// No eviction can happen before some set has been completely filled.
    #[test]
    fn evictions_wait_for_a_full_set(geometry in small_geometry(), addrs in addresses()) {
        let mut sim = Simulator::new(geometry).unwrap();
        for &a in &addrs {
            let any_full_before = sim.cache.sets().any(|s| s.is_full());
            if sim.access(Address::new(a)) == AccessOutcome::MissEviction {
                prop_assert!(any_full_before);
            }
        }
    }

    #[test]
    fn matches_reference_lru(geometry in small_geometry(), addrs in addresses()) {
        let mut sim = Simulator::new(geometry).unwrap();
        let mut model = ReferenceLru::new(&geometry);
        for &a in &addrs {
            let _ = sim.access(Address::new(a));
            model.access(a);
        }
        prop_assert_eq!(sim.stats, model.stats);
    }

    /// Repeating one address N times: exactly one miss and N - 1 hits.
    #[test]
    fn repeated_hits_are_idempotent(geometry in small_geometry(), a in any::<u64>(), n in 1usize..50) {
        let mut sim = Simulator::new(geometry).unwrap();
        for _ in 0..n {
            let _ = sim.access(Address::new(a));
        }
        prop_assert_eq!(sim.stats.misses, 1);
        prop_assert_eq!(sim.stats.hits, n as u64 - 1);
        prop_assert_eq!(sim.stats.evictions, 0);
    }
}
