//! Cache block metadata.
//!
//! A block's storage slot (its way) is fixed when the tag store is built. Only its
//! position in the owning set's recency list changes, and only its metadata is
//! rewritten on fill and invalidation.

use crate::common::{Addr, BlockKind};

/// Handle to a block: its set index and way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Set index.
    pub set: usize,
    /// Way within the set.
    pub way: usize,
}

/// Tag and replacement metadata for one way of one set.
#[derive(Clone, Debug)]
pub struct CacheBlock {
    /// Address high bits.
    pub tag: u64,
    /// Storage slot within the set.
    pub way: usize,
    /// Holds a live block.
    pub valid: bool,
    /// Secure-world block.
    pub secure: bool,
    /// Modified since fill.
    pub dirty: bool,
    /// Traffic class type bit.
    pub kind: BlockKind,
    /// Re-reference prediction value (TRRIP only).
    pub rrpv: u8,
    /// References since fill, including the fill itself.
    pub ref_count: u32,
    pub(super) prev: Option<usize>,
    pub(super) next: Option<usize>,
}

impl CacheBlock {
    pub(super) const fn new(way: usize) -> Self {
        Self {
            tag: 0,
            way,
            valid: false,
            secure: false,
            dirty: false,
            kind: BlockKind::Write,
            rrpv: 0,
            ref_count: 0,
            prev: None,
            next: None,
        }
    }

    /// Tag and security state match a lookup.
    #[inline]
    pub fn matches(&self, tag: u64, secure: bool) -> bool {
        self.valid && self.tag == tag && self.secure == secure
    }
}

/// A valid block displaced by an installation.
///
/// Returned from [`TagStore::insert_block`](super::TagStore::insert_block) so the
/// caller can schedule a write-back when `dirty` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Block-aligned address of the displaced block.
    pub addr: Addr,
    /// The displaced block was modified.
    pub dirty: bool,
    /// The displaced block was secure.
    pub secure: bool,
}
