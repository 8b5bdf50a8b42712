//! Statistics Python binding.
//!
//! Exposes tag store statistics to Python: getters for lookup and replacement
//! counters, `print` / `print_sections` for human-readable output, and `to_dict`
//! for JSON-serializable export.

use pyo3::prelude::*;
use pyo3::types::PyDict;
use tagsim_core::stats::TagStats;

/// Python-exposed statistics: a snapshot of `TagStats`.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PyStats {
    /// The wrapped counters.
    pub inner: TagStats,
}

#[pymethods]
impl PyStats {
    #[getter]
    fn hits(&self) -> u64 {
        self.inner.hits
    }
    #[getter]
    fn misses(&self) -> u64 {
        self.inner.misses
    }
    #[getter]
    fn accesses(&self) -> u64 {
        self.inner.accesses()
    }
    #[getter]
    fn hit_rate(&self) -> f64 {
        self.inner.hit_rate()
    }
    #[getter]
    fn insertions(&self) -> u64 {
        self.inner.insertions
    }
    #[getter]
    fn replacements(&self) -> u64 {
        self.inner.replacements
    }
    #[getter]
    fn dirty_evictions(&self) -> u64 {
        self.inner.dirty_evictions
    }
    #[getter]
    fn invalidations(&self) -> u64 {
        self.inner.invalidations
    }
    #[getter]
    fn alloc_failures(&self) -> u64 {
        self.inner.alloc_failures
    }
    #[getter]
    fn tags_in_use(&self) -> u64 {
        self.inner.tags_in_use
    }
    #[getter]
    fn avg_refs(&self) -> f64 {
        self.inner.avg_refs()
    }

    /// Print all stats.
    fn print(&self) {
        self.inner.print();
    }

    /// Print only the given sections. Options: "summary", "replacement", "occupancy".
    /// Pass an empty list for a full dump.
    #[allow(clippy::needless_pass_by_value)]
    fn print_sections(&self, sections: Vec<String>) {
        self.inner.print_sections(&sections);
    }

    /// Export all stats as a Python dict.
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let d = PyDict::new(py);
        let s = &self.inner;
        d.set_item("hits", s.hits)?;
        d.set_item("misses", s.misses)?;
        d.set_item("insertions", s.insertions)?;
        d.set_item("replacements", s.replacements)?;
        d.set_item("dirty_evictions", s.dirty_evictions)?;
        d.set_item("invalidations", s.invalidations)?;
        d.set_item("alloc_failures", s.alloc_failures)?;
        d.set_item("tags_in_use", s.tags_in_use)?;
        d.set_item("total_refs", s.total_refs)?;
        d.set_item("sampled_refs", s.sampled_refs)?;
        d.set_item("hit_rate", s.hit_rate())?;
        d.set_item("avg_refs", s.avg_refs())?;
        Ok(d)
    }

    fn __repr__(&self) -> String {
        format!(
            "PyStats(hits={}, misses={}, replacements={}, tags_in_use={})",
            self.inner.hits, self.inner.misses, self.inner.replacements, self.inner.tags_in_use
        )
    }
}

impl From<TagStats> for PyStats {
    fn from(inner: TagStats) -> Self {
        Self { inner }
    }
}
