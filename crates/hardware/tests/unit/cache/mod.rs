//! Tag store and replacement policy tests.

/// Invalidation behaviour shared by every policy.
pub mod invalidate;




/// Bimodal RRIP policy.
pub mod trrip;

/// Write-back-aware policy.
pub mod wbar;
