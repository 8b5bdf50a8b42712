//! Tag store statistics collection and reporting.
//!
//! This module tracks what the tag store observed. It provides:
//! 1. **Lookups:** Hits and misses, with the derived hit rate.
//! 2. **Replacement:** Insertions, replacements of valid blocks, dirty evictions, and
//!    allocation failures.
//! 3. **Occupancy:** Valid blocks in use and sampled per-block reference counts.

use serde::Serialize;

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"replacement"`, `"occupancy"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "replacement", "occupancy"];

/// Counters maintained by a [`TagStore`](crate::cache::TagStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TagStats {
    /// Lookups that found a valid matching block.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
    /// Blocks installed.
    pub insertions: u64,
    /// Installations that displaced a valid block.
    pub replacements: u64,
    /// Displaced blocks that were dirty.
    pub dirty_evictions: u64,
    /// Valid blocks invalidated.
    pub invalidations: u64,
    /// Victim searches that found no allocatable way.
    pub alloc_failures: u64,
    /// Valid blocks currently held.
    pub tags_in_use: u64,
    /// Sum of reference counts of blocks sampled at replacement.
    pub total_refs: u64,
    /// Blocks sampled into `total_refs`.
    pub sampled_refs: u64,
}

impl TagStats {
    /// Total lookups.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, or 0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Average references per replaced block, or 0 with no samples.
    pub fn avg_refs(&self) -> f64 {
        if self.sampled_refs == 0 {
            0.0
        } else {
            self.total_refs as f64 / self.sampled_refs as f64
        }
    }

    /// Serializes the counters plus derived rates as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            let _ = map.insert("hit_rate".into(), self.hit_rate().into());
            let _ = map.insert("avg_refs".into(), self.avg_refs().into());
        }
        value
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty
    /// slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("\n==========================================================");
        println!("TAG STORE STATISTICS");
        println!("==========================================================");
        if want("summary") {
            println!("tags.accesses            {}", self.accesses());
            println!("tags.hits                {}", self.hits);
            println!("tags.misses              {}", self.misses);
            println!("tags.hit_rate            {:.2}%", self.hit_rate() * 100.0);
            println!("----------------------------------------------------------");
        }
        if want("replacement") {
            println!("REPLACEMENT");
            println!("  insertions             {}", self.insertions);
            println!("  replacements           {}", self.replacements);
            println!("  dirty_evictions        {}", self.dirty_evictions);
            println!("  invalidations          {}", self.invalidations);
            println!("  alloc_failures         {}", self.alloc_failures);
            println!("----------------------------------------------------------");
        }
        if want("occupancy") {
            println!("OCCUPANCY");
            println!("  tags_in_use            {}", self.tags_in_use);
            println!("  sampled_refs           {}", self.sampled_refs);
            println!("  avg_refs               {:.2}", self.avg_refs());
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
