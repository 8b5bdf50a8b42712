//! Trace driver: owns a tag store and replays operations against it.
//!
//! Each access follows the miss discipline the tag store expects: lookup, then on a
//! miss one victim search and one installation of that victim. The fetch itself is
//! treated as completing immediately; latency is only accumulated, not scheduled.

use tracing::debug;

use super::trace::TraceOp;
use crate::cache::{Eviction, TagStore};
use crate::common::ConfigError;
use crate::config::TagStoreConfig;
use crate::stats::TagStats;

/// What happened to one trace record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The lookup hit.
    pub hit: bool,
    /// A block was installed.
    pub filled: bool,
    /// The fill was deferred because no way was allocatable.
    pub deferred: bool,
    /// Block displaced by the fill.
    pub eviction: Option<Eviction>,
    /// Lookup latency in cycles.
    pub latency: u64,
}

/// Replays trace records through a [`TagStore`].
#[derive(Debug)]
pub struct TraceDriver {
    /// The tag store being driven.
    pub store: TagStore,
    requester: u32,
    deferred: u64,
    writebacks: u64,
    cycles: u64,
}

impl TraceDriver {
    /// Builds a driver around a fresh tag store.
    ///
    /// # Errors
    ///
    /// Returns the configuration error from [`TagStore::new`].
    pub fn new(config: &TagStoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_store(TagStore::new(config)?))
    }

    /// Builds a driver around an existing tag store.
    pub fn with_store(store: TagStore) -> Self {
        Self {
            store,
            requester: 0,
            deferred: 0,
            writebacks: 0,
            cycles: 0,
        }
    }

    /// Requester id reported on every access.
    #[must_use]
    pub fn with_requester(mut self, requester: u32) -> Self {
        self.requester = requester;
        self
    }

    /// Fills dropped for lack of an allocatable way.
    pub const fn deferred(&self) -> u64 {
        self.deferred
    }

    /// Dirty evictions that would be written to the next level.
    pub const fn writebacks(&self) -> u64 {
        self.writebacks
    }

    /// Accumulated lookup latency.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Tag store statistics.
    pub const fn stats(&self) -> &TagStats {
        self.store.stats()
    }

    /// Applies one trace record.
    pub fn step(&mut self, op: TraceOp) -> StepOutcome {
        let Some(request) = op.fill_request() else {
            if let Some(id) = self.store.find_block(op.addr(), false) {
                self.store.invalidate(id);
            }
            return StepOutcome::default();
        };

        let (hit, latency) = self.store.access_block(request.addr, request.secure, self.requester);
        self.cycles += latency;
        let mut outcome = StepOutcome {
            hit: hit.is_some(),
            latency,
            ..StepOutcome::default()
        };

        if let Some(id) = hit {
            if request.dirties() {
                self.store.mark_dirty(id);
            }
            return outcome;
        }

        match self.store.find_victim(request.addr) {
            Some(victim) => {
                outcome.eviction = self.store.insert_block(&request, victim);
                outcome.filled = true;
                if outcome.eviction.is_some_and(|e| e.dirty) {
                    self.writebacks += 1;
                }
            }
            None => {
                self.deferred += 1;
                outcome.deferred = true;
                debug!(addr = request.addr, "fill deferred");
            }
        }
        outcome
    }

    /// Applies every record in order and returns the resulting statistics.
    pub fn run<I: IntoIterator<Item = TraceOp>>(&mut self, ops: I) -> &TagStats {
        for op in ops {
            let _ = self.step(op);
        }
        self.store.stats()
    }
}
