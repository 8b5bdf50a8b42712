//! TRRIP (Bimodal RRIP) Policy Tests.
//!
//! Verifies RRPV assignment on fill and hit, set aging during victim search,
//! the invalid-way preference, and the bimodal near-distant insertion.

use pretty_assertions::assert_eq;
use tagsim_core::cache::policies::Policy;
use tagsim_core::cache::policies::trrip::HIT_STEP;
use tagsim_core::common::BlockKind;
use tagsim_core::config::ReplacementPolicy;

use crate::common::{TestStore, config};

fn trrip(t: &TestStore) -> &tagsim_core::cache::policies::TrripPolicy {
    match t.store.policy() {
        Policy::Trrip(p) => p,
        other => panic!("expected TRRIP, got {:?}", other.kind()),
    }
}

fn rrpvs(t: &TestStore, set: usize) -> Vec<u8> {
    t.store.set(set).blocks().iter().map(|b| b.rrpv).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Insertion
// ══════════════════════════════════════════════════════════

/// Write-driven fills are predicted distant, demand fills one step nearer.
#[test]
fn fill_rrpv_depends_on_request_kind() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    let w = t.write_fill(0, 1);
    let r = t.read_fill(0, 2);
    let wb = t.writeback_fill(0, 3);

    assert_eq!(t.store.block(w).rrpv, 7);
    assert_eq!(t.store.block(r).rrpv, 6);
    assert_eq!(t.store.block(wb).rrpv, 7);
    assert_eq!(t.store.block(r).kind, BlockKind::Demand);
    assert_eq!(t.store.block(wb).kind, BlockKind::Write);
}

/// Invalid ways are filled from the LRU end without touching the recency list.
#[test]
fn fills_take_invalid_ways_from_lru_end() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    let ways: Vec<usize> = (1..=4).map(|tag| t.write_fill(1, tag).way).collect();
    assert_eq!(ways, vec![3, 2, 1, 0]);
    assert_eq!(t.store.recency(1), vec![0, 1, 2, 3]);
}

/// On the bimodal boundary a fill is predicted near-distant.
#[test]
fn bimodal_boundary_inserts_near_distant() {
    let mut cfg = config(ReplacementPolicy::Trrip, 4, 4);
    cfg.policy_params.trrip_bimodal_period = 2;
    let mut t = TestStore::new(&cfg);

    let first = t.write_fill(0, 1);
    assert_eq!(trrip(&t).bip_interval(0), 1);
    assert_eq!(t.store.block(first).rrpv, 7);

    let second = t.write_fill(0, 2);
    assert_eq!(trrip(&t).bip_interval(0), 2);
    assert_eq!(t.store.block(second).rrpv, 5);

    let third = t.read_fill(0, 3);
    assert_eq!(trrip(&t).bip_interval(0), 0);
    assert_eq!(t.store.block(third).rrpv, 6);
}

// ══════════════════════════════════════════════════════════
// 2. Hit path
// ══════════════════════════════════════════════════════════

/// A demand hit predicts immediate reuse.
#[test]
fn demand_hit_resets_rrpv() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    let id = t.read_fill(0, 1);
    let _ = t.touch(0, 1).unwrap();
    assert_eq!(t.store.block(id).rrpv, 0);
}

/// A write-driven hit only steps the RRPV down, saturating at zero.
#[test]
fn write_hit_steps_rrpv_down() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    let id = t.write_fill(0, 1);

    let mut expected = 7u8;
    for _ in 0..4 {
        let _ = t.touch(0, 1).unwrap();
        expected = expected.saturating_sub(HIT_STEP);
        assert_eq!(t.store.block(id).rrpv, expected);
    }
    assert_eq!(expected, 0);
}

// ══════════════════════════════════════════════════════════
// 3. Victim selection
// ══════════════════════════════════════════════════════════

/// With one reused demand block among distant write blocks, the demand block survives.
#[test]
fn reused_demand_block_is_not_victim() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 8);
    for tag in 1..=7 {
        let _ = t.write_fill(0, tag);
    }
    let demand = t.read_fill(0, 8);
    assert_eq!(demand.way, 0);
    let _ = t.touch(0, 8).unwrap();
    assert_eq!(t.store.block(demand).rrpv, 0);

    let victim = t.store.find_victim(t.addr(0, 9)).unwrap();
    assert_ne!(victim, demand);
    assert_eq!(victim.way, 1);
    assert_eq!(t.store.block(victim).rrpv, 7);
    // Nothing needed aging.
    assert_eq!(t.store.block(demand).rrpv, 0);
}

/// When no block is distant the whole set ages until one is.
#[test]
fn search_ages_set_until_a_block_is_distant() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    for tag in 1..=4 {
        let _ = t.read_fill(2, tag);
        let _ = t.touch(2, tag).unwrap();
    }
    assert_eq!(rrpvs(&t, 2), vec![0, 0, 0, 0]);

    let victim = t.store.find_victim(t.addr(2, 5)).unwrap();
    assert_eq!(victim.way, 0);
    assert_eq!(rrpvs(&t, 2), vec![7, 7, 7, 7]);
}

/// Aging stops as soon as the leading block reaches the ceiling.
#[test]
fn aging_stops_at_first_distant_block() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
    }
    // Ways 3..0 hold tags 1..4 at RRPV 6; reset all but way 1.
    for tag in [1, 2, 4] {
        let _ = t.touch(0, tag).unwrap();
    }
    assert_eq!(rrpvs(&t, 0), vec![0, 6, 0, 0]);

    let victim = t.store.find_victim(t.addr(0, 9)).unwrap();
    assert_eq!(victim.way, 1);
    assert_eq!(rrpvs(&t, 0), vec![1, 7, 1, 1]);
}

/// An invalidated way is reused before any valid block is aged.
#[test]
fn invalid_way_is_preferred_over_aging() {
    let mut t = TestStore::with_policy(ReplacementPolicy::Trrip, 4);
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
        let _ = t.touch(0, tag).unwrap();
    }
    let gone = t.store.find_block(t.addr(0, 2), false).unwrap();
    t.store.invalidate(gone);

    let victim = t.store.find_victim(t.addr(0, 9)).unwrap();
    assert_eq!(victim, gone);
    assert!(
        t.store
            .set(0)
            .blocks()
            .iter()
            .filter(|b| b.valid)
            .all(|b| b.rrpv == 0)
    );
}

/// Aging only picks among allocatable ways.
#[test]
fn victim_respects_allocatable_ways() {
    let mut cfg = config(ReplacementPolicy::Trrip, 4, 4);
    cfg.alloc_assoc = Some(2);
    let mut t = TestStore::new(&cfg);

    for tag in 0..12 {
        let id = t.write_fill(1, tag);
        assert!(id.way < 2);
    }
    assert_eq!(t.store.stats().replacements, 10);
}

/// No allocatable way means no victim.
#[test]
fn zero_allocatable_ways_has_no_victim() {
    let mut cfg = config(ReplacementPolicy::Trrip, 4, 4);
    cfg.alloc_assoc = Some(0);
    let mut t = TestStore::new(&cfg);
    assert!(t.store.find_victim(0).is_none());
    assert_eq!(t.store.stats().alloc_failures, 1);
}

/// A custom ceiling bounds every RRPV.
#[test]
fn custom_rrpv_max_bounds_values() {
    let mut cfg = config(ReplacementPolicy::Trrip, 4, 4);
    cfg.policy_params.rrpv_max = 3;
    let mut t = TestStore::new(&cfg);
    assert_eq!(trrip(&t).rrpv_max(), 3);

    for tag in 0..16 {
        let _ = t.write_fill(0, tag);
        let _ = t.read_fill(0, tag + 100);
    }
    assert!(rrpvs(&t, 0).iter().all(|&r| r <= 3));
}
