//! Address region classification for write-back-aware replacement.
//!
//! An address belongs to the boundary region when `tag * block_size * num_sets`,
//! its tag-aligned base, is at or below a configured boundary. Everything above is
//! the complement region. The classification is a pure function of the address.

use crate::common::{Addr, AddrLayout, BlockKind};

/// Which side of the configured boundary an address falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Tag-aligned base at or below the boundary.
    Boundary,
    /// Tag-aligned base above the boundary.
    Complement,
}

impl Region {
    /// Type bit stored in blocks of this region.
    #[inline]
    pub const fn kind(self) -> BlockKind {
        match self {
            Self::Boundary => BlockKind::Write,
            Self::Complement => BlockKind::Demand,
        }
    }

    /// Region recorded by a block's type bit.
    #[inline]
    pub const fn from_kind(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Write => Self::Boundary,
            BlockKind::Demand => Self::Complement,
        }
    }
}

/// Classifies addresses against a fixed boundary.
#[derive(Clone, Copy, Debug)]
pub struct RegionClassifier {
    layout: AddrLayout,
    boundary: u64,
}

impl RegionClassifier {
    /// Creates a classifier for `layout` with an inclusive `boundary`.
    pub const fn new(layout: AddrLayout, boundary: u64) -> Self {
        Self { layout, boundary }
    }

    /// Region of `addr`.
    pub const fn classify(&self, addr: Addr) -> Region {
        let base = self
            .layout
            .extract_tag(addr)
            .saturating_mul(self.layout.block_size())
            .saturating_mul(self.layout.num_sets());
        if base <= self.boundary {
            Region::Boundary
        } else {
            Region::Complement
        }
    }
}
