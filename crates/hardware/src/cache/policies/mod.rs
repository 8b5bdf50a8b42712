//! Cache Replacement Policies.
//!
//! Implements the eviction and insertion algorithms that drive a
//! [`TagStore`](super::TagStore). All of them share the set/block arena and expose the
//! same four hooks.
//!
//! # Policies
//!
//! - `Trash`: LIP/BIP hybrid. LRU victim, mostly-LRU insertion with bimodal and demand
//!   bypass to MRU.
//! - `Trrip`: Bimodal RRIP. Victim by maximum re-reference prediction value with set aging.
//! - `Wbar`: Write-back-aware. Adaptive per-set counter sets insertion and promotion depth.

/// LIP/BIP hybrid replacement policy.
pub mod trash;

/// Bimodal re-reference interval prediction policy.
pub mod trrip;

/// Write-back-aware replacement policy.
pub mod wbar;

use std::fmt;

pub use trash::TrashPolicy;
pub use trrip::TrripPolicy;
pub use wbar::WbarPolicy;

use super::region::RegionClassifier;
use super::set::CacheSet;
use crate::common::FillRequest;
use crate::config::{ReplacementPolicy as PolicyType, TagStoreConfig};

/// Trait for cache replacement policies.
///
/// Every hook receives the set it acts on together with its index, so per-set
/// policy state can be kept in the policy itself.
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Updates policy state after a lookup in `set`.
    ///
    /// # Arguments
    ///
    /// * `set` - The set selected by the looked-up address.
    /// * `index` - The set index.
    /// * `hit` - The way that hit, or `None` on a miss.
    fn on_access(&mut self, set: &mut CacheSet, index: usize, hit: Option<usize>);

    /// Selects a victim among ways `< alloc_assoc`.
    ///
    /// Returns `None` when no way is allocatable. May update policy state
    /// (aging, demand tracking), so call it exactly once per fill.
    fn select_victim(
        &mut self,
        set: &mut CacheSet,
        index: usize,
        alloc_assoc: usize,
    ) -> Option<usize>;

    /// Sets the initial replacement state of a freshly filled `way`.
    ///
    /// Tag, valid, dirty and the request-derived type bit are already written.
    fn on_fill(&mut self, set: &mut CacheSet, index: usize, way: usize, request: &FillRequest);

    /// Demotes an invalidated `way` so it is chosen before any valid block.
    fn on_invalidate(&mut self, set: &mut CacheSet, _index: usize, way: usize) {
        set.move_to_tail(way);
    }
}

/// Replacement policy selected at configuration time.
#[derive(Debug)]
pub enum Policy {
    /// LIP/BIP hybrid.
    Trash(TrashPolicy),
    /// Bimodal RRIP.
    Trrip(TrripPolicy),
    /// Write-back-aware replacement.
    Wbar(WbarPolicy),
}

impl Policy {
    /// Builds the policy named by `config` for `num_sets` sets.
    pub fn from_config(
        config: &TagStoreConfig,
        classifier: RegionClassifier,
        num_sets: usize,
    ) -> Self {
        let params = &config.policy_params;
        match config.policy {
            PolicyType::Trash => Self::Trash(TrashPolicy::new(num_sets, params.trash_bip_period)),
            PolicyType::Trrip => Self::Trrip(TrripPolicy::new(
                num_sets,
                params.trrip_bimodal_period,
                params.rrpv_max,
            )),
            PolicyType::Wbar => Self::Wbar(WbarPolicy::new(num_sets, config.assoc, classifier)),
        }
    }

    /// Which algorithm this is.
    pub const fn kind(&self) -> PolicyType {
        match self {
            Self::Trash(_) => PolicyType::Trash,
            Self::Trrip(_) => PolicyType::Trrip,
            Self::Wbar(_) => PolicyType::Wbar,
        }
    }

    fn inner(&mut self) -> &mut dyn ReplacementPolicy {
        match self {
            Self::Trash(p) => p,
            Self::Trrip(p) => p,
            Self::Wbar(p) => p,
        }
    }
}

impl ReplacementPolicy for Policy {
    fn on_access(&mut self, set: &mut CacheSet, index: usize, hit: Option<usize>) {
        self.inner().on_access(set, index, hit);
    }

    fn select_victim(
        &mut self,
        set: &mut CacheSet,
        index: usize,
        alloc_assoc: usize,
    ) -> Option<usize> {
        self.inner().select_victim(set, index, alloc_assoc)
    }

    fn on_fill(&mut self, set: &mut CacheSet, index: usize, way: usize, request: &FillRequest) {
        self.inner().on_fill(set, index, way, request);
    }

    fn on_invalidate(&mut self, set: &mut CacheSet, index: usize, way: usize) {
        self.inner().on_invalidate(set, index, way);
    }
}

/// Per-set access counter that cycles over a bimodal period.
///
/// Advances on every access and resets to zero on the access after it reaches the
/// period; the set is at its bimodal boundary while the counter equals the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BimodalCounter {
    value: u32,
    period: u32,
}

impl BimodalCounter {
    /// A counter at zero.
    pub const fn new(period: u32) -> Self {
        Self { value: 0, period }
    }

    /// Current value, in `[0, period]`.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Steps the counter, wrapping on equality with the period.
    #[inline]
    pub const fn advance(&mut self) {
        if self.value == self.period {
            self.value = 0;
        } else {
            self.value += 1;
        }
    }

    /// The counter has reached the period.
    #[inline]
    pub const fn at_boundary(&self) -> bool {
        self.value == self.period
    }
}

/// Least recently promoted way below `alloc_assoc`, scanning from the tail.
pub fn lru_victim(set: &CacheSet, alloc_assoc: usize) -> Option<usize> {
    set.iter_lru().find(|&way| way < alloc_assoc)
}
