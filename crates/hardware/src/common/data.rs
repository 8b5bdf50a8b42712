//! Fill Request and Traffic Classification.
//!
//! This module defines what the memory system hands the tag store when a fetched
//! block is ready to be installed. These types are used for the following:
//! 1. **Installation:** Carrying the address, security state and traffic kind of a fill.
//! 2. **Classification:** Deriving the per-block type bit that the policies key off.

use super::addr::Addr;

/// Traffic class recorded in a block's type bit.
///
/// Under TRASH and TRRIP the bit records how the block was brought in. Under WBAR it
/// records the address region instead: the boundary region is stored as [`Write`] and
/// the complement region as [`Demand`].
///
/// [`Write`]: BlockKind::Write
/// [`Demand`]: BlockKind::Demand
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// Write-driven block (store miss or write-back fill). Reset state of every block.
    #[default]
    Write,
    /// Demand (read-driven) block.
    Demand,
}

/// Descriptor for an installation into a previously selected victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillRequest {
    /// Address of the fetched block.
    pub addr: Addr,
    /// Secure-world access.
    pub secure: bool,
    /// The miss was caused by a store.
    pub is_write: bool,
    /// The fill carries write-back data from an upper level.
    pub is_writeback: bool,
}

impl FillRequest {
    /// A demand read fill.
    pub const fn read(addr: Addr) -> Self {
        Self {
            addr,
            secure: false,
            is_write: false,
            is_writeback: false,
        }
    }

    /// A store-miss fill.
    pub const fn write(addr: Addr) -> Self {
        Self {
            addr,
            secure: false,
            is_write: true,
            is_writeback: false,
        }
    }

    /// A write-back fill from an upper level.
    pub const fn writeback(addr: Addr) -> Self {
        Self {
            addr,
            secure: false,
            is_write: false,
            is_writeback: true,
        }
    }

    /// Marks the request as a secure-world access.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// The installed block will be dirty.
    #[inline]
    pub const fn dirties(&self) -> bool {
        self.is_write || self.is_writeback
    }

    /// Traffic class derived from the request: reads are demand, everything else is write-driven.
    #[inline]
    pub const fn kind(&self) -> BlockKind {
        if self.dirties() {
            BlockKind::Write
        } else {
            BlockKind::Demand
        }
    }
}
