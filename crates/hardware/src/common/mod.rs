//! Common types used throughout the tag store.
//!
//! This module provides the building blocks shared by the cache, the policies and the
//! trace driver. It includes:
//! 1. **Address Decomposition:** Tag/set extraction and address regeneration.
//! 2. **Fill Requests:** The descriptor handed to `insert_block` and the block type bit.
//! 3. **Error Handling:** Configuration and trace errors.

/// Address type and tag/set decomposition.
pub mod addr;

/// Fill request descriptor and traffic classification.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{Addr, AddrLayout};
pub use data::{BlockKind, FillRequest};
pub use error::{ConfigError, TraceError};
