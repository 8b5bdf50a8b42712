//! Configuration system for the tag store.
//!
//! This module defines the configuration structures used to parameterize a tag store.
//! It provides:
//! 1. **Defaults:** Named constants for the policy parameters (bimodal periods, RRPV
//!    ceiling, region boundary).
//! 2. **Structures:** Geometry and latency in [`TagStoreConfig`], policy tuning in
//!    [`PolicyConfig`].
//! 3. **Enums:** The replacement policy selector.
//!
//! Configuration is supplied as JSON (from the Python bindings or the CLI), or use
//! `TagStoreConfig::default()`.

use serde::Deserialize;

use crate::common::{AddrLayout, ConfigError};

/// Default configuration constants for the tag store.
mod defaults {
    /// Default capacity (256 KiB).
    pub const SIZE_BYTES: u64 = 256 * 1024;

    /// Default block size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Default associativity.
    pub const ASSOC: usize = 8;

    /// Default tag lookup latency in cycles.
    pub const TAG_LATENCY: u64 = 2;

    /// Default data array latency in cycles.
    pub const DATA_LATENCY: u64 = 2;

    /// TRASH bimodal insertion period (accesses per set between forced MRU insertions).
    pub const TRASH_BIP_PERIOD: u32 = 23;

    /// TRRIP bimodal insertion period.
    pub const TRRIP_BIMODAL_PERIOD: u32 = 80;

    /// RRPV ceiling (3-bit RRPV).
    pub const RRPV_MAX: u8 = 7;

    /// WBAR region boundary (1 GiB).
    ///
    /// Addresses whose tag-aligned base is at or below this value form the boundary region.
    pub const REGION_BOUNDARY: u64 = 1024 * 1024 * 1024;
}

/// Cache replacement policy algorithms.
///
/// Specifies which eviction/insertion scheme drives the tag store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// LIP/BIP hybrid.
    ///
    /// LRU victim search; insertions stay at the LRU end except on bimodal
    /// boundaries or when the set already holds demand blocks.
    #[default]
    #[serde(alias = "Trash", alias = "trash", alias = "LipBip")]
    Trash,
    /// Bimodal re-reference interval prediction.
    ///
    /// Evicts the block predicted to be re-referenced furthest in the future,
    /// aging the set until such a block exists.
    #[serde(alias = "Trrip", alias = "trrip")]
    Trrip,
    /// Write-back-aware replacement.
    ///
    /// Per-set adaptive counter steers insertion and promotion depth by address
    /// region and write-back vs. demand traffic.
    #[serde(alias = "Wbar", alias = "wbar")]
    Wbar,
}

/// Tuning parameters for the replacement policies.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// TRASH: accesses per set between bimodal MRU insertions.
    #[serde(default = "PolicyConfig::default_trash_bip_period")]
    pub trash_bip_period: u32,

    /// TRRIP: accesses per set between near-distant insertions.
    #[serde(default = "PolicyConfig::default_trrip_bimodal_period")]
    pub trrip_bimodal_period: u32,

    /// TRRIP: maximum re-reference prediction value.
    #[serde(default = "PolicyConfig::default_rrpv_max")]
    pub rrpv_max: u8,

    /// WBAR: upper bound (inclusive) of the boundary address region.
    #[serde(default = "PolicyConfig::default_region_boundary")]
    pub region_boundary: u64,
}

impl PolicyConfig {
    fn default_trash_bip_period() -> u32 {
        defaults::TRASH_BIP_PERIOD
    }

    fn default_trrip_bimodal_period() -> u32 {
        defaults::TRRIP_BIMODAL_PERIOD
    }

    fn default_rrpv_max() -> u8 {
        defaults::RRPV_MAX
    }

    fn default_region_boundary() -> u64 {
        defaults::REGION_BOUNDARY
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            trash_bip_period: defaults::TRASH_BIP_PERIOD,
            trrip_bimodal_period: defaults::TRRIP_BIMODAL_PERIOD,
            rrpv_max: defaults::RRPV_MAX,
            region_boundary: defaults::REGION_BOUNDARY,
        }
    }
}

/// Tag store geometry, timing and policy selection.
///
/// # Examples
///
/// ```
/// use tagsim_core::config::{ReplacementPolicy, TagStoreConfig};
///
/// let json = r#"{
///     "size_bytes": 32768,
///     "block_size": 64,
///     "assoc": 8,
///     "alloc_assoc": 6,
///     "policy": "TRRIP",
///     "policy_params": { "rrpv_max": 3 }
/// }"#;
///
/// let config = TagStoreConfig::from_json(json).unwrap();
/// assert_eq!(config.num_sets(), 64);
/// assert_eq!(config.allocatable_ways(), 6);
/// assert_eq!(config.policy, ReplacementPolicy::Trrip);
/// assert_eq!(config.policy_params.rrpv_max, 3);
/// assert_eq!(config.policy_params.trrip_bimodal_period, 80);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TagStoreConfig {
    /// Capacity in bytes.
    #[serde(default = "TagStoreConfig::default_size")]
    pub size_bytes: u64,

    /// Block size in bytes.
    #[serde(default = "TagStoreConfig::default_block_size")]
    pub block_size: u64,

    /// Associativity (ways per set).
    #[serde(default = "TagStoreConfig::default_assoc")]
    pub assoc: usize,

    /// Ways eligible as eviction targets (`way < alloc_assoc`). Defaults to `assoc`.
    #[serde(default)]
    pub alloc_assoc: Option<usize>,

    /// Tag lookup latency in cycles.
    #[serde(default = "TagStoreConfig::default_tag_latency")]
    pub tag_latency: u64,

    /// Data array latency in cycles.
    #[serde(default = "TagStoreConfig::default_data_latency")]
    pub data_latency: u64,

    /// Access tags and data sequentially instead of in parallel.
    #[serde(default)]
    pub sequential_access: bool,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Policy tuning parameters.
    #[serde(default)]
    pub policy_params: PolicyConfig,
}

impl TagStoreConfig {
    fn default_size() -> u64 {
        defaults::SIZE_BYTES
    }

    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    fn default_assoc() -> usize {
        defaults::ASSOC
    }

    fn default_tag_latency() -> u64 {
        defaults::TAG_LATENCY
    }

    fn default_data_latency() -> u64 {
        defaults::DATA_LATENCY
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or the first validation
    /// failure reported by [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of sets implied by the geometry.
    ///
    /// Only meaningful after [`validate`](Self::validate) has succeeded.
    pub fn num_sets(&self) -> u64 {
        match self.set_bytes() {
            Some(set_bytes) if set_bytes != 0 => self.size_bytes / set_bytes,
            _ => 0,
        }
    }

    /// Bytes covered by one set, or `None` if `block_size * assoc` overflows.
    pub fn set_bytes(&self) -> Option<u64> {
        self.block_size.checked_mul(self.assoc as u64)
    }

    /// Ways eligible for eviction.
    pub fn allocatable_ways(&self) -> usize {
        self.alloc_assoc.unwrap_or(self.assoc)
    }

    /// Latency of a lookup, in cycles.
    pub fn access_latency(&self, hit: bool) -> u64 {
        if !hit {
            self.tag_latency
        } else if self.sequential_access {
            self.tag_latency + self.data_latency
        } else {
            self.tag_latency.max(self.data_latency)
        }
    }

    /// Address layout for this geometry.
    ///
    /// # Errors
    ///
    /// Propagates the power-of-two checks of [`AddrLayout::new`].
    pub fn layout(&self) -> Result<AddrLayout, ConfigError> {
        AddrLayout::new(self.block_size, self.num_sets())
    }

    /// Checks geometry and policy parameters.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assoc == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_size));
        }
        let set_bytes = self.set_bytes().ok_or(ConfigError::GeometryOverflow {
            block_size: self.block_size,
            assoc: self.assoc,
        })?;
        if self.size_bytes % set_bytes != 0 {
            return Err(ConfigError::SizeNotMultipleOfSet {
                size: self.size_bytes,
                set_bytes,
            });
        }
        let _ = self.layout()?;
        if self.allocatable_ways() > self.assoc {
            return Err(ConfigError::AllocAssocTooLarge {
                alloc_assoc: self.allocatable_ways(),
                assoc: self.assoc,
            });
        }
        let params = &self.policy_params;
        if params.rrpv_max < 2 {
            return Err(ConfigError::RrpvMaxTooSmall(params.rrpv_max));
        }
        if params.trash_bip_period == 0 {
            return Err(ConfigError::ZeroBimodalPeriod("trash"));
        }
        if params.trrip_bimodal_period == 0 {
            return Err(ConfigError::ZeroBimodalPeriod("trrip"));
        }
        Ok(())
    }
}

impl Default for TagStoreConfig {
    /// 256 KiB, 64-byte blocks, 8-way, TRASH replacement, parallel tag/data access.
    fn default() -> Self {
        Self {
            size_bytes: defaults::SIZE_BYTES,
            block_size: defaults::BLOCK_SIZE,
            assoc: defaults::ASSOC,
            alloc_assoc: None,
            tag_latency: defaults::TAG_LATENCY,
            data_latency: defaults::DATA_LATENCY,
            sequential_access: false,
            policy: ReplacementPolicy::default(),
            policy_params: PolicyConfig::default(),
        }
    }
}
