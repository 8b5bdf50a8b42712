//! Invalidation Tests.
//!
//! Invalidation behaves the same under every policy: the block turns invalid and
//! clean, moves to the tail of its set, and is the next victim.

use pretty_assertions::assert_eq;
use rstest::rstest;
use tagsim_core::FillRequest;
use tagsim_core::config::ReplacementPolicy;

use crate::common::TestStore;

#[rstest]
#[case::trash(ReplacementPolicy::Trash)]
#[case::trrip(ReplacementPolicy::Trrip)]
#[case::wbar(ReplacementPolicy::Wbar)]
fn invalidated_block_moves_to_tail(#[case] policy: ReplacementPolicy) {
    let mut t = TestStore::with_policy(policy, 4);
    for tag in 1..=4 {
        let _ = t.read_fill(0, tag);
        let _ = t.touch(0, tag).unwrap();
    }
    let id = t.store.find_block(t.addr(0, 3), false).unwrap();
    t.store.invalidate(id);

    let block = t.store.block(id);
    assert!(!block.valid);
    assert!(!block.dirty);
    assert_eq!(t.tail(0), id.way);
    assert!(t.store.set(0).is_well_formed());
    assert!(t.touch(0, 3).is_none());
}

#[rstest]
#[case::trash(ReplacementPolicy::Trash)]
#[case::trrip(ReplacementPolicy::Trrip)]
#[case::wbar(ReplacementPolicy::Wbar)]
fn invalidated_block_is_next_victim(#[case] policy: ReplacementPolicy) {
    let mut t = TestStore::with_policy(policy, 4);
    for tag in 1..=4 {
        let _ = t.write_fill(1, tag);
    }
    let id = t.store.find_block(t.addr(1, 2), false).unwrap();
    t.store.invalidate(id);

    let victim = t.store.find_victim(t.addr(1, 9)).unwrap();
    assert_eq!(victim, id);
    let eviction = t.store.insert_block(&FillRequest::read(t.addr(1, 9)), victim);
    assert!(eviction.is_none());
}

#[rstest]
#[case::trash(ReplacementPolicy::Trash)]
#[case::trrip(ReplacementPolicy::Trrip)]
#[case::wbar(ReplacementPolicy::Wbar)]
fn invalidation_updates_stats(#[case] policy: ReplacementPolicy) {
    let mut t = TestStore::with_policy(policy, 4);
    let a = t.write_fill(0, 1);
    let _ = t.read_fill(0, 2);
    assert_eq!(t.store.stats().tags_in_use, 2);

    t.store.invalidate(a);
    assert_eq!(t.store.stats().invalidations, 1);
    assert_eq!(t.store.stats().tags_in_use, 1);

    // Invalidating an invalid block still demotes it but counts nothing.
    t.store.invalidate(a);
    assert_eq!(t.store.stats().invalidations, 1);
    assert_eq!(t.store.stats().tags_in_use, 1);
    assert_eq!(t.tail(0), a.way);
}

#[rstest]
#[case::trash(ReplacementPolicy::Trash)]
#[case::trrip(ReplacementPolicy::Trrip)]
#[case::wbar(ReplacementPolicy::Wbar)]
fn invalidate_all_reports_dirty_blocks(#[case] policy: ReplacementPolicy) {
    let mut t = TestStore::with_policy(policy, 4);
    let _ = t.write_fill(0, 1);
    let _ = t.read_fill(1, 2);
    let _ = t.writeback_fill(2, 3);
    let _ = t.read_fill(3, 4);

    let dirty = t.store.invalidate_all();
    let addrs: Vec<u64> = dirty.iter().map(|e| e.addr).collect();
    assert_eq!(addrs, vec![t.addr(0, 1), t.addr(2, 3)]);
    assert!(dirty.iter().all(|e| e.dirty));
    assert_eq!(t.store.stats().tags_in_use, 0);
    assert_eq!(t.store.stats().invalidations, 4);
    for set in 0..4 {
        assert!(t.store.set(set).blocks().iter().all(|b| !b.valid));
        assert!(t.store.set(set).is_well_formed());
    }
}
