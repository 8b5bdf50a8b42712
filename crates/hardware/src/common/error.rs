//! Error definitions.
//!
//! This module defines the error types surfaced by the tag store crate. It provides:
//! 1. **Configuration Errors:** Geometry and policy parameters rejected at construction.
//! 2. **Trace Errors:** Malformed lines or I/O failures while replaying an address trace.
//!
//! Steady-state tag store operations never fail; a set with no allocatable way is
//! reported as `None` from victim selection, not as an error.

use std::io;

use thiserror::Error;

/// Reasons a [`TagStoreConfig`](crate::config::TagStoreConfig) is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Block size must be a non-zero power of two.
    #[error("block size {0} is not a non-zero power of two")]
    BlockSizeNotPowerOfTwo(u64),

    /// The derived set count must be a non-zero power of two.
    #[error("set count {0} is not a non-zero power of two")]
    SetCountNotPowerOfTwo(u64),

    /// Associativity must be at least one way.
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    /// Capacity must divide evenly into `block_size * assoc` sets.
    #[error("cache size {size} is not a multiple of block_size * assoc ({set_bytes})")]
    SizeNotMultipleOfSet {
        /// Configured capacity in bytes.
        size: u64,
        /// Bytes covered by one set.
        set_bytes: u64,
    },

    /// `block_size * assoc` does not fit in 64 bits.
    #[error("set size overflows: block_size {block_size} * assoc {assoc}")]
    GeometryOverflow {
        /// Configured block size in bytes.
        block_size: u64,
        /// Ways per set.
        assoc: usize,
    },

    /// The allocatable partition cannot exceed the set.
    #[error("alloc_assoc {alloc_assoc} exceeds associativity {assoc}")]
    AllocAssocTooLarge {
        /// Requested allocatable ways.
        alloc_assoc: usize,
        /// Ways per set.
        assoc: usize,
    },

    /// The RRPV ceiling must leave room for the near-distant value `rrpv_max - 2`.
    #[error("rrpv_max {0} must be at least 2")]
    RrpvMaxTooSmall(u8),

    /// Bimodal periods of zero would make every access a bimodal boundary.
    #[error("bimodal period for {0} must be non-zero")]
    ZeroBimodalPeriod(&'static str),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while reading an address trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line did not match `<op> <addr>`.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The trace source could not be read.
    #[error("trace I/O: {0}")]
    Io(#[from] io::Error),
}
