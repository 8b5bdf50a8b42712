//! LIP/BIP Hybrid (TRASH) Replacement Policy.
//!
//! Victims are chosen LRU-style from the tail of the recency list. Insertions stay at
//! the LRU end (LIP) unless one of two bypasses applies, in which case the new block
//! goes to the MRU end:
//!
//! - the set's bimodal counter is at its period (BIP), or
//! - the set held a demand block at the last victim search and the new block is demand.
//!
//! The bimodal counter advances on every access to the set, hit or miss.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()`: O(1)
//!   - `select_victim()`: O(W) where W is the number of ways
//!   - `on_fill()`: O(1)
//! - **Space Complexity:** O(S) where S is the number of sets
//! - **Best Case:** Working sets larger than the cache (scan resistance)
//! - **Worst Case:** Recency-friendly reuse of freshly inserted lines

use tracing::debug;

use super::{BimodalCounter, ReplacementPolicy, lru_victim};
use crate::cache::set::CacheSet;
use crate::common::{BlockKind, FillRequest};

/// TRASH policy state.
#[derive(Debug)]
pub struct TrashPolicy {
    bip: Vec<BimodalCounter>,
    /// `true` when no block in the set carried the demand type at its last victim search.
    lip: Vec<bool>,
}

impl TrashPolicy {
    /// Creates a TRASH policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `bip_period` - Accesses per set between bimodal MRU insertions.
    pub fn new(sets: usize, bip_period: u32) -> Self {
        Self {
            bip: vec![BimodalCounter::new(bip_period); sets],
            lip: vec![true; sets],
        }
    }

    /// Bimodal counter of `set`.
    pub fn bip_interval(&self, set: usize) -> u32 {
        self.bip[set].value()
    }

    /// LIP flag of `set`.
    pub fn lip(&self, set: usize) -> bool {
        self.lip[set]
    }
}

impl ReplacementPolicy for TrashPolicy {
    /// Advances the bimodal counter and moves a hit block to MRU.
    fn on_access(&mut self, set: &mut CacheSet, index: usize, hit: Option<usize>) {
        self.bip[index].advance();
        if let Some(way) = hit {
            set.move_to_head(way);
            debug!(set = index, way, "moving block to MRU");
        }
    }

    /// Returns the LRU-most allocatable way and refreshes the LIP flag.
    fn select_victim(
        &mut self,
        set: &mut CacheSet,
        index: usize,
        alloc_assoc: usize,
    ) -> Option<usize> {
        let victim = lru_victim(set, alloc_assoc);
        self.lip[index] = !set.blocks().iter().any(|b| b.kind == BlockKind::Demand);
        if let Some(way) = victim {
            debug!(set = index, way, lip = self.lip[index], "selecting block for replacement");
        }
        victim
    }

    /// Leaves the block at the LRU end unless a bimodal or demand bypass applies.
    fn on_fill(&mut self, set: &mut CacheSet, index: usize, way: usize, _request: &FillRequest) {
        let bimodal = self.bip[index].at_boundary();
        let demand = !self.lip[index] && set.block(way).kind == BlockKind::Demand;
        if bimodal || demand {
            set.move_to_head(way);
            debug!(set = index, way, bimodal, "inserting block at MRU");
        }
    }
}
