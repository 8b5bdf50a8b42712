//! Set-Associative Tag Store.
//!
//! This module implements the tag array of a set-associative cache with a pluggable
//! replacement policy. The surrounding memory system drives it through four operations:
//!
//! 1. [`TagStore::access_block`] on every lookup (hit-path replacement update).
//! 2. [`TagStore::find_victim`] on a miss, before the fetch is issued.
//! 3. [`TagStore::insert_block`] once the fetch completes, committing that victim.
//! 4. [`TagStore::invalidate`] on coherence downgrades.
//!
//! A miss must go through `find_victim`, the external fetch, and exactly one
//! `insert_block` for that victim. Victim selection can age or retag policy state, so
//! repeated uncommitted searches on one set let that state drift ahead of the real
//! evictions. `invalidate` may be interleaved at any point.

/// Block metadata and handles.
pub mod block;

/// Replacement policy implementations (TRASH, TRRIP, WBAR).
pub mod policies;

/// Address region classification.
pub mod region;

/// Set storage and recency list.
pub mod set;

use tracing::{debug, trace};

pub use self::block::{BlockId, CacheBlock, Eviction};
use self::policies::{Policy, ReplacementPolicy};
pub use self::region::{Region, RegionClassifier};
pub use self::set::CacheSet;
use crate::common::{Addr, AddrLayout, ConfigError, FillRequest};
use crate::config::TagStoreConfig;
use crate::stats::TagStats;

/// Tag store: an array of sets sharing one replacement policy.
#[derive(Debug)]
pub struct TagStore {
    config: TagStoreConfig,
    layout: AddrLayout,
    alloc_assoc: usize,
    sets: Vec<CacheSet>,
    policy: Policy,
    stats: TagStats,
}

impl TagStore {
    /// Creates a tag store with every block invalid.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`TagStoreConfig::validate`].
    pub fn new(config: &TagStoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = config.layout()?;
        let num_sets = layout.num_sets() as usize;
        let classifier = RegionClassifier::new(layout, config.policy_params.region_boundary);

        debug!(
            num_sets,
            assoc = config.assoc,
            alloc_assoc = config.allocatable_ways(),
            policy = ?config.policy,
            "building tag store"
        );

        Ok(Self {
            config: config.clone(),
            layout,
            alloc_assoc: config.allocatable_ways(),
            sets: (0..num_sets).map(|_| CacheSet::new(config.assoc)).collect(),
            policy: Policy::from_config(config, classifier, num_sets),
            stats: TagStats::default(),
        })
    }

    /// Configuration this store was built from.
    pub const fn config(&self) -> &TagStoreConfig {
        &self.config
    }

    /// Address layout.
    pub const fn layout(&self) -> &AddrLayout {
        &self.layout
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Ways per set.
    pub const fn assoc(&self) -> usize {
        self.config.assoc
    }

    /// Ways eligible for eviction.
    pub const fn alloc_assoc(&self) -> usize {
        self.alloc_assoc
    }

    /// Replacement policy and its per-set state.
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Statistics collected so far.
    pub const fn stats(&self) -> &TagStats {
        &self.stats
    }

    /// Clears event counters, keeping occupancy.
    pub fn reset_stats(&mut self) {
        self.stats = TagStats {
            tags_in_use: self.stats.tags_in_use,
            ..TagStats::default()
        };
    }

    /// Set index of `addr`.
    #[inline]
    pub const fn extract_set(&self, addr: Addr) -> usize {
        self.layout.extract_set(addr)
    }

    /// Tag of `addr`.
    #[inline]
    pub const fn extract_tag(&self, addr: Addr) -> u64 {
        self.layout.extract_tag(addr)
    }

    /// Block-aligned address of `tag` in `set`.
    #[inline]
    pub const fn regenerate_address(&self, tag: u64, set: usize) -> Addr {
        self.layout.regenerate_address(tag, set)
    }

    /// Set `index`.
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }

    /// Block behind `id`.
    pub fn block(&self, id: BlockId) -> &CacheBlock {
        self.sets[id.set].block(id.way)
    }

    /// Block-aligned address currently held by `id`.
    pub fn block_addr(&self, id: BlockId) -> Addr {
        self.regenerate_address(self.block(id).tag, id.set)
    }

    /// Recency order of `set`, head (most valuable) first.
    pub fn recency(&self, set: usize) -> Vec<usize> {
        self.sets[set].recency()
    }

    /// Looks up `addr` without touching replacement state or statistics.
    pub fn find_block(&self, addr: Addr, secure: bool) -> Option<BlockId> {
        let set = self.extract_set(addr);
        let tag = self.extract_tag(addr);
        self.sets[set]
            .find(tag, secure)
            .map(|way| BlockId { set, way })
    }

    /// Looks up `addr` and applies the policy's hit-path update.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address being accessed.
    /// * `secure` - Security state of the access.
    /// * `requester` - Identifier of the requesting agent (logged only).
    ///
    /// # Returns
    ///
    /// The hit block (or `None` on a miss) and the lookup latency in cycles.
    pub fn access_block(
        &mut self,
        addr: Addr,
        secure: bool,
        requester: u32,
    ) -> (Option<BlockId>, u64) {
        let index = self.extract_set(addr);
        let tag = self.extract_tag(addr);
        let set = &mut self.sets[index];
        let hit = set.find(tag, secure);

        if let Some(way) = hit {
            self.stats.hits += 1;
            let block = set.block_mut(way);
            block.ref_count = block.ref_count.saturating_add(1);
        } else {
            self.stats.misses += 1;
        }
        self.policy.on_access(set, index, hit);
        trace!(addr, set = index, requester, hit = hit.is_some(), "access");

        (
            hit.map(|way| BlockId { set: index, way }),
            self.config.access_latency(hit.is_some()),
        )
    }

    /// Chooses the block to replace for a miss on `addr`.
    ///
    /// Returns `None` when the set has no way below `alloc_assoc`; the caller must
    /// defer the fill. The returned block may still be valid; it is evicted by the
    /// matching [`insert_block`](Self::insert_block).
    pub fn find_victim(&mut self, addr: Addr) -> Option<BlockId> {
        let index = self.extract_set(addr);
        let victim = self
            .policy
            .select_victim(&mut self.sets[index], index, self.alloc_assoc);
        match victim {
            Some(way) => {
                assert!(way < self.alloc_assoc, "victim way {way} outside allocatable ways");
                Some(BlockId { set: index, way })
            }
            None => {
                self.stats.alloc_failures += 1;
                debug!(addr, set = index, "no allocatable way");
                None
            }
        }
    }

    /// Installs the block described by `request` into `victim`.
    ///
    /// # Returns
    ///
    /// The displaced block when `victim` was valid, so the caller can write it back.
    pub fn insert_block(&mut self, request: &FillRequest, victim: BlockId) -> Option<Eviction> {
        let index = victim.set;
        debug_assert_eq!(index, self.extract_set(request.addr), "victim is in the wrong set");
        debug_assert!(victim.way < self.alloc_assoc, "victim outside allocatable ways");

        let tag = self.extract_tag(request.addr);
        let evicted_addr = self.regenerate_address(self.sets[index].block(victim.way).tag, index);
        let set = &mut self.sets[index];
        let block = set.block_mut(victim.way);

        let eviction = if block.valid {
            self.stats.replacements += 1;
            self.stats.total_refs += u64::from(block.ref_count);
            self.stats.sampled_refs += 1;
            if block.dirty {
                self.stats.dirty_evictions += 1;
            }
            Some(Eviction {
                addr: evicted_addr,
                dirty: block.dirty,
                secure: block.secure,
            })
        } else {
            self.stats.tags_in_use += 1;
            None
        };

        block.tag = tag;
        block.valid = true;
        block.secure = request.secure;
        block.dirty = request.dirties();
        block.kind = request.kind();
        block.ref_count = 1;
        self.stats.insertions += 1;

        self.policy.on_fill(set, index, victim.way, request);
        debug!(
            addr = request.addr,
            set = index,
            way = victim.way,
            evicted = eviction.is_some(),
            "inserted block"
        );
        eviction
    }

    /// Marks a valid block as modified, as the cache does on a store hit.
    pub fn mark_dirty(&mut self, id: BlockId) {
        let block = self.sets[id.set].block_mut(id.way);
        if block.valid {
            block.dirty = true;
        }
    }

    /// Invalidates `id` and demotes it to the tail of its set.
    pub fn invalidate(&mut self, id: BlockId) {
        let set = &mut self.sets[id.set];
        let block = set.block_mut(id.way);
        if block.valid {
            block.valid = false;
            block.dirty = false;
            self.stats.invalidations += 1;
            self.stats.tags_in_use -= 1;
        }
        self.policy.on_invalidate(set, id.set, id.way);
        debug!(set = id.set, way = id.way, "invalidated block");
    }

    /// Invalidates every valid block, returning the dirty ones in set order.
    pub fn invalidate_all(&mut self) -> Vec<Eviction> {
        let mut dirty = Vec::new();
        for set in 0..self.sets.len() {
            for way in 0..self.config.assoc {
                let id = BlockId { set, way };
                let block = self.block(id);
                if !block.valid {
                    continue;
                }
                if block.dirty {
                    dirty.push(Eviction {
                        addr: self.block_addr(id),
                        dirty: true,
                        secure: block.secure,
                    });
                }
                self.invalidate(id);
            }
        }
        dirty
    }
}
