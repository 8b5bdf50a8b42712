//! Bimodal Re-Reference Interval Prediction (TRRIP) Replacement Policy.
//!
//! Each block carries an RRPV in `[0, rrpv_max]`; lower means sooner predicted reuse.
//! The victim is the allocatable block with the largest RRPV. If none has reached
//! `rrpv_max`, every block in the set is aged by one and the search repeats, which
//! takes at most `rrpv_max` rounds.
//!
//! Insertion is bimodal: on the set's bimodal boundary new blocks start near-distant
//! (`rrpv_max - 2`); otherwise demand blocks start at `rrpv_max - 1` and write-driven
//! blocks at `rrpv_max`. Demand hits reset the RRPV to 0, other hits lower it by
//! [`HIT_STEP`].
//!
//! The recency list is only touched by invalidation; it plays no part in victim choice.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()`: O(1)
//!   - `select_victim()`: O(W × R) worst case, where R is `rrpv_max`
//!   - `on_fill()`: O(1)
//! - **Space Complexity:** O(S × W) RRPV bits
//! - **Best Case:** Mixed scans and reuse (scan resistance with thrash protection)
//! - **Worst Case:** Pure recency-friendly patterns where LRU is optimal

use tracing::{debug, trace};

use super::{BimodalCounter, ReplacementPolicy};
use crate::cache::set::CacheSet;
use crate::common::{BlockKind, FillRequest};

/// RRPV reduction for a hit on a write-driven block.
pub const HIT_STEP: u8 = 3;

/// TRRIP policy state. Per-block RRPVs live in the blocks themselves.
#[derive(Debug)]
pub struct TrripPolicy {
    bip: Vec<BimodalCounter>,
    rrpv_max: u8,
}

impl TrripPolicy {
    /// Creates a TRRIP policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `bimodal_period` - Accesses per set between near-distant insertions.
    /// * `rrpv_max` - RRPV ceiling; must be at least 2.
    pub fn new(sets: usize, bimodal_period: u32, rrpv_max: u8) -> Self {
        Self {
            bip: vec![BimodalCounter::new(bimodal_period); sets],
            rrpv_max,
        }
    }

    /// RRPV ceiling.
    pub const fn rrpv_max(&self) -> u8 {
        self.rrpv_max
    }

    /// Bimodal counter of `set`.
    pub fn bip_interval(&self, set: usize) -> u32 {
        self.bip[set].value()
    }

    /// First allocatable way with the largest RRPV, in way order.
    fn search(set: &CacheSet, alloc_assoc: usize) -> (usize, u8) {
        let mut best = (0, set.block(0).rrpv);
        for way in 1..alloc_assoc {
            let rrpv = set.block(way).rrpv;
            if rrpv > best.1 {
                best = (way, rrpv);
            }
        }
        best
    }
}

impl ReplacementPolicy for TrripPolicy {
    /// Advances the bimodal counter and lowers the RRPV of a hit block.
    fn on_access(&mut self, set: &mut CacheSet, index: usize, hit: Option<usize>) {
        self.bip[index].advance();
        if let Some(way) = hit {
            let block = set.block_mut(way);
            block.rrpv = match block.kind {
                BlockKind::Demand => 0,
                BlockKind::Write => block.rrpv.saturating_sub(HIT_STEP),
            };
            debug!(set = index, way, rrpv = block.rrpv, "promoting block");
        }
    }

    /// Prefers an invalid allocatable way; otherwise ages the set until a block
    /// reaches `rrpv_max` and returns the first such way.
    fn select_victim(
        &mut self,
        set: &mut CacheSet,
        index: usize,
        alloc_assoc: usize,
    ) -> Option<usize> {
        if alloc_assoc == 0 {
            return None;
        }
        if let Some(way) = set
            .iter_lru()
            .find(|&way| way < alloc_assoc && !set.block(way).valid)
        {
            return Some(way);
        }

        let mut rounds = 0u8;
        loop {
            let (way, rrpv) = Self::search(set, alloc_assoc);
            if rrpv >= self.rrpv_max {
                debug!(set = index, way, rounds, "selecting block for replacement");
                return Some(way);
            }
            let ceiling = self.rrpv_max;
            for block in set.blocks_mut() {
                block.rrpv = block.rrpv.saturating_add(1).min(ceiling);
            }
            rounds += 1;
            trace!(set = index, rounds, "aging set");
            debug_assert!(rounds <= self.rrpv_max, "RRIP aging did not converge");
        }
    }

    /// Sets the initial RRPV: near-distant on the bimodal boundary, otherwise by type.
    fn on_fill(&mut self, set: &mut CacheSet, index: usize, way: usize, _request: &FillRequest) {
        let rrpv = if self.bip[index].at_boundary() {
            self.rrpv_max - 2
        } else {
            match set.block(way).kind {
                BlockKind::Write => self.rrpv_max,
                BlockKind::Demand => self.rrpv_max - 1,
            }
        };
        set.block_mut(way).rrpv = rrpv;
        debug!(set = index, way, rrpv, "inserting block");
    }
}
