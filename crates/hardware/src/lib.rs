//! Set-associative cache tag store library.
//!
//! This crate implements the tag array of a set-associative cache with interchangeable
//! replacement policies:
//! 1. **Tag Store:** Block/set arena with per-set recency lists and way partitioning.
//! 2. **Policies:** TRASH (LIP/BIP hybrid), TRRIP (bimodal RRIP) and WBAR (write-back-aware).
//! 3. **Common:** Address decomposition, fill requests, and error types.
//! 4. **Simulation:** Configuration, statistics, and a trace-driven driver.

/// Tag store, blocks, sets, and replacement policies.
pub mod cache;
/// Common types (address layout, fill requests, errors).
pub mod common;
/// Tag store configuration (geometry, latency, policy parameters).
pub mod config;
/// Trace parsing and replay.
pub mod sim;
/// Tag store statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `TagStoreConfig::default()` or deserialize from JSON.
pub use crate::config::TagStoreConfig;
/// The tag store; construct with `TagStore::new`.
pub use crate::cache::TagStore;
/// Fill request descriptor passed to `TagStore::insert_block`.
pub use crate::common::FillRequest;
