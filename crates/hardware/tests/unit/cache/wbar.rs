//! WBAR (Write-Back-Aware) Policy Tests.
//!
//! Verifies region retyping, counter-driven insertion depth, hit promotion, and
//! the counter bounds.

use pretty_assertions::assert_eq;
use tagsim_core::FillRequest;
use tagsim_core::cache::Region;
use tagsim_core::cache::policies::Policy;
use tagsim_core::common::BlockKind;
use tagsim_core::config::ReplacementPolicy;

use crate::common::TestStore;

/// First tag whose span lies above the default 1 GiB boundary (4 sets of 64 bytes).
const HIGH_TAG: u64 = 1 << 23;

fn counter(t: &TestStore, set: usize) -> usize {
    match t.store.policy() {
        Policy::Wbar(p) => p.counter(set),
        other => panic!("expected WBAR, got {:?}", other.kind()),
    }
}

fn wbar8() -> TestStore {
    TestStore::with_policy(ReplacementPolicy::Wbar, 8)
}

// ══════════════════════════════════════════════════════════
// 1. Region typing
// ══════════════════════════════════════════════════════════

#[test]
fn fill_is_retyped_by_region() {
    let mut t = wbar8();
    let low = t.read_fill(0, 1);
    let high = t.write_fill(1, HIGH_TAG + 1);

    assert_eq!(t.store.block(low).kind, BlockKind::Write);
    assert_eq!(t.store.block(high).kind, BlockKind::Demand);

    let Policy::Wbar(p) = t.store.policy() else {
        panic!("expected WBAR");
    };
    assert_eq!(p.classifier().classify(t.addr(0, 1)), Region::Boundary);
    assert_eq!(p.classifier().classify(t.addr(1, HIGH_TAG + 1)), Region::Complement);
}

// ══════════════════════════════════════════════════════════
// 2. Insertion and counter
// ══════════════════════════════════════════════════════════

/// Boundary demand fills land at the tail and raise the counter; a complement
/// write-back then lands at the head and a later boundary fill goes back to the tail.
#[test]
fn counter_drives_insertion_depth() {
    let mut t = wbar8();
    for tag in 1..=4 {
        let id = t.read_fill(0, tag);
        assert_eq!(id.way, 7);
        assert_eq!(t.tail(0), 7);
    }
    assert_eq!(counter(&t, 0), 4);

    let wb = t.writeback_fill(0, HIGH_TAG);
    assert_eq!(wb.way, 7);
    assert_eq!(t.head(0), 7);
    assert_eq!(counter(&t, 0), 4);

    let next = t.read_fill(0, 5);
    assert_eq!(next.way, 6);
    assert_eq!(t.tail(0), 6);
    assert_eq!(counter(&t, 0), 5);
}

/// Boundary write-backs are placed `counter / 2` slots above the tail.
#[test]
fn boundary_writeback_lands_above_tail() {
    let mut t = wbar8();
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
    }
    let id = t.writeback_fill(0, 50);
    assert_eq!(t.position(id), 5);
    assert_eq!(counter(&t, 0), 4);
}

/// Complement demand fills lower the counter and sit `counter / 4` above the tail.
#[test]
fn complement_demand_fill_lowers_counter() {
    let mut t = wbar8();
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
    }
    let id = t.read_fill(0, HIGH_TAG + 7);
    assert_eq!(t.position(id), 6);
    assert_eq!(counter(&t, 0), 3);
}

#[test]
fn counter_stays_within_ways() {
    let mut t = wbar8();
    for tag in 0..20 {
        let _ = t.read_fill(0, tag);
    }
    assert_eq!(counter(&t, 0), 7);

    for tag in 0..20 {
        let _ = t.read_fill(1, HIGH_TAG + tag);
    }
    assert_eq!(counter(&t, 1), 0);
}

/// Counters are per set.
#[test]
fn counters_are_independent_per_set() {
    let mut t = wbar8();
    for tag in 0..3 {
        let _ = t.read_fill(2, tag);
    }
    assert_eq!(counter(&t, 2), 3);
    assert_eq!(counter(&t, 3), 0);
}

/// Write-backs never move the counter.
#[test]
fn writebacks_leave_counter_alone() {
    let mut t = wbar8();
    for tag in 0..6 {
        let _ = t.writeback_fill(0, tag);
        let _ = t.fill(FillRequest::writeback(t.addr(0, HIGH_TAG + tag)));
    }
    assert_eq!(counter(&t, 0), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Hit path
// ══════════════════════════════════════════════════════════

/// A boundary hit climbs `counter / 2` slots.
#[test]
fn boundary_hit_promotes_by_half_counter() {
    let mut t = wbar8();
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
    }
    let id = t.store.find_block(t.addr(0, 4), false).unwrap();
    assert_eq!(t.position(id), 7);

    let _ = t.touch(0, 4).unwrap();
    assert_eq!(t.position(id), 5);
    let _ = t.touch(0, 4).unwrap();
    assert_eq!(t.position(id), 3);
}

/// With a zero counter a boundary hit does not move the block.
#[test]
fn boundary_hit_with_zero_counter_stays_put() {
    let mut t = wbar8();
    let id = t.writeback_fill(0, 1);
    assert_eq!(t.position(id), 7);
    let _ = t.touch(0, 1).unwrap();
    assert_eq!(t.position(id), 7);
}

/// A complement hit goes straight to the head.
#[test]
fn complement_hit_moves_to_head() {
    let mut t = wbar8();
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
    }
    let id = t.read_fill(0, HIGH_TAG);
    assert_ne!(t.head(0), id.way);
    let _ = t.touch(0, HIGH_TAG).unwrap();
    assert_eq!(t.head(0), id.way);
}

/// Victims come from the tail.
#[test]
fn victim_is_tail_block() {
    let mut t = wbar8();
    for tag in 0..8 {
        let _ = t.writeback_fill(3, HIGH_TAG + tag);
    }
    let tail = t.tail(3);
    let victim = t.store.find_victim(t.addr(3, 99)).unwrap();
    assert_eq!(victim.way, tail);
}
