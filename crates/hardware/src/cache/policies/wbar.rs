//! Write-Back-Aware Replacement (WBAR) Policy.
//!
//! Blocks are typed at fill time by address region (see [`RegionClassifier`]). Each set
//! keeps an adaptive counter in `[0, assoc - 1]` that rises with demand misses to the
//! boundary region and falls with demand misses to the complement region. The counter
//! picks insertion depth and hit promotion distance:
//!
//! | fill                    | insertion position       | counter      |
//! |-------------------------|--------------------------|--------------|
//! | write-back, complement  | `counter / 8`            | unchanged    |
//! | write-back, boundary    | `assoc - 1 - counter / 2`| unchanged    |
//! | demand, complement      | `assoc - 1 - counter / 4`| decremented  |
//! | demand, boundary        | `assoc - 1 - counter / 8`| incremented  |
//!
//! Complement-region hits move to MRU; boundary-region hits are promoted by
//! `counter / 2` slots. Victims come from the LRU end.

use tracing::debug;

use super::{ReplacementPolicy, lru_victim};
use crate::cache::region::{Region, RegionClassifier};
use crate::cache::set::CacheSet;
use crate::common::FillRequest;

/// WBAR policy state.
#[derive(Debug)]
pub struct WbarPolicy {
    counters: Vec<usize>,
    assoc: usize,
    classifier: RegionClassifier,
}

impl WbarPolicy {
    /// Creates a WBAR policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `assoc` - Ways per set; bounds the adaptive counter.
    /// * `classifier` - Address region classifier.
    pub fn new(sets: usize, assoc: usize, classifier: RegionClassifier) -> Self {
        Self {
            counters: vec![0; sets],
            assoc,
            classifier,
        }
    }

    /// Adaptive counter of `set`.
    pub fn counter(&self, set: usize) -> usize {
        self.counters[set]
    }

    /// Region classifier used at fill time.
    pub const fn classifier(&self) -> &RegionClassifier {
        &self.classifier
    }

    /// Insertion position for a fill, and the counter value after it.
    ///
    /// `counter` must be below `assoc`.
    pub const fn placement(
        assoc: usize,
        counter: usize,
        is_writeback: bool,
        region: Region,
    ) -> (usize, usize) {
        let last = assoc - 1;
        match (is_writeback, region) {
            (true, Region::Complement) => (counter / 8, counter),
            (true, Region::Boundary) => (last - counter / 2, counter),
            (false, Region::Complement) => (last - counter / 4, counter.saturating_sub(1)),
            (false, Region::Boundary) => {
                let next = if counter < last { counter + 1 } else { last };
                (last - counter / 8, next)
            }
        }
    }
}

impl ReplacementPolicy for WbarPolicy {
    /// Complement-region hits go to MRU; boundary-region hits move up `counter / 2` slots.
    fn on_access(&mut self, set: &mut CacheSet, index: usize, hit: Option<usize>) {
        let Some(way) = hit else {
            return;
        };
        let counter = self.counters[index];
        match Region::from_kind(set.block(way).kind) {
            Region::Complement => {
                set.move_to_head(way);
                debug!(set = index, way, "moving block to MRU");
            }
            Region::Boundary => {
                set.promote(way, counter / 2);
                debug!(set = index, way, offset = counter / 2, "promoting block");
            }
        }
    }

    fn select_victim(
        &mut self,
        set: &mut CacheSet,
        index: usize,
        alloc_assoc: usize,
    ) -> Option<usize> {
        let victim = lru_victim(set, alloc_assoc);
        if let Some(way) = victim {
            debug!(set = index, way, "selecting block for replacement");
        }
        victim
    }

    /// Retypes the block by region and places it according to the adaptive counter.
    fn on_fill(&mut self, set: &mut CacheSet, index: usize, way: usize, request: &FillRequest) {
        let region = self.classifier.classify(request.addr);
        set.block_mut(way).kind = region.kind();

        let counter = self.counters[index];
        let (pos, next) = Self::placement(self.assoc, counter, request.is_writeback, region);
        self.counters[index] = next;
        set.move_to_position(way, pos);
        debug!(set = index, way, pos, counter = next, "inserting block");
    }
}
