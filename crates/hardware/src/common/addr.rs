//! Address decomposition for set-associative lookups.
//!
//! This module splits a physical address into the fields a tag store needs. It provides:
//! 1. **Set Extraction:** Selects the set from the bits above the block offset.
//! 2. **Tag Extraction:** Returns the high-order bits that identify a block within its set.
//! 3. **Regeneration:** Rebuilds the block-aligned address from a `(tag, set)` pair.
//!
//! All functions are pure; the layout is fixed at construction from the block size and
//! set count, both of which must be powers of two.

use super::error::ConfigError;

/// An unsigned address in the backing store.
pub type Addr = u64;

/// Bit layout of an address for a given block size and set count.
///
/// ```text
///  63                 set_shift+set_bits   block_bits        0
/// +-----------------------+--------------------+---------------+
/// |          tag          |     set index      | block offset  |
/// +-----------------------+--------------------+---------------+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddrLayout {
    block_size: u64,
    num_sets: u64,
    block_bits: u32,
    set_bits: u32,
}

impl AddrLayout {
    /// Creates a layout for `block_size`-byte blocks spread over `num_sets` sets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlockSizeNotPowerOfTwo`] or
    /// [`ConfigError::SetCountNotPowerOfTwo`] if either parameter is zero or not a
    /// power of two.
    pub fn new(block_size: u64, num_sets: u64) -> Result<Self, ConfigError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(block_size));
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(num_sets));
        }
        Ok(Self {
            block_size,
            num_sets,
            block_bits: block_size.trailing_zeros(),
            set_bits: num_sets.trailing_zeros(),
        })
    }

    /// Block size in bytes.
    #[inline(always)]
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Number of sets.
    #[inline(always)]
    pub const fn num_sets(&self) -> u64 {
        self.num_sets
    }

    /// Returns the set index selected by `addr`.
    #[inline(always)]
    pub const fn extract_set(&self, addr: Addr) -> usize {
        ((addr >> self.block_bits) & (self.num_sets - 1)) as usize
    }

    /// Returns the tag bits of `addr`.
    #[inline(always)]
    pub const fn extract_tag(&self, addr: Addr) -> u64 {
        addr >> (self.block_bits + self.set_bits)
    }

    /// Rebuilds the block-aligned address for `tag` in `set`.
    #[inline(always)]
    pub const fn regenerate_address(&self, tag: u64, set: usize) -> Addr {
        (tag << (self.block_bits + self.set_bits)) | ((set as u64) << self.block_bits)
    }

    /// Clears the block offset bits of `addr`.
    #[inline(always)]
    pub const fn block_align(&self, addr: Addr) -> Addr {
        addr & !(self.block_size - 1)
    }
}
