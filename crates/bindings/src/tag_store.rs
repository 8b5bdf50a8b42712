//! Tag store Python binding.
//!
//! Exposes the tag store operations one by one (`access`, `find_victim`, `insert`,
//! `invalidate`) for callers that model their own memory system, plus `step` and
//! `run_trace` for trace-driven replay. Block handles cross the boundary as
//! `(set, way)` tuples and evictions as `(addr, dirty, secure)` tuples.

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use tagsim_core::FillRequest;
use tagsim_core::cache::BlockId;
use tagsim_core::common::Addr;
use tagsim_core::sim::{TraceDriver, TraceOp, load_trace};

use crate::conversion::{block_to_tuple, eviction_to_tuple, py_dict_to_config};
use crate::stats::PyStats;

/// Python-exposed tag store: wraps a `TraceDriver` and the `TagStore` it owns.
#[pyclass]
#[derive(Debug)]
pub struct PyTagStore {
    /// Driver owning the store.
    pub inner: TraceDriver,
}

impl PyTagStore {
    fn block_id(&self, set: usize, way: usize) -> PyResult<BlockId> {
        let store = &self.inner.store;
        if set >= store.num_sets() || way >= store.assoc() {
            return Err(PyIndexError::new_err(format!(
                "block ({set}, {way}) outside {}x{} tag store",
                store.num_sets(),
                store.assoc()
            )));
        }
        Ok(BlockId { set, way })
    }
}

#[pymethods]
impl PyTagStore {
    /// Creates a tag store from an optional config dict.
    ///
    /// # Errors
    ///
    /// Raises `ValueError` if the config is malformed or fails validation.
    #[new]
    #[pyo3(signature = (config_dict=None))]
    fn new(py: Python<'_>, config_dict: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = match config_dict {
            Some(dict) => py_dict_to_config(py, dict)?,
            None => tagsim_core::TagStoreConfig::default(),
        };
        let driver = TraceDriver::new(&config)
            .map_err(|e| PyValueError::new_err(format!("Invalid config: {e}")))?;
        Ok(Self { inner: driver })
    }

    /// Number of sets.
    #[getter]
    fn num_sets(&self) -> usize {
        self.inner.store.num_sets()
    }

    /// Ways per set.
    #[getter]
    fn assoc(&self) -> usize {
        self.inner.store.assoc()
    }

    /// Ways eligible for eviction.
    #[getter]
    fn alloc_assoc(&self) -> usize {
        self.inner.store.alloc_assoc()
    }

    /// Replacement policy name.
    #[getter]
    fn policy(&self) -> String {
        format!("{:?}", self.inner.store.policy().kind()).to_uppercase()
    }

    /// Looks up `addr`, updating replacement state.
    ///
    /// Returns `((set, way) or None, latency)`.
    #[pyo3(signature = (addr, secure=false, requester=0))]
    fn access(
        &mut self,
        addr: Addr,
        secure: bool,
        requester: u32,
    ) -> (Option<(usize, usize)>, u64) {
        let (hit, latency) = self.inner.store.access_block(addr, secure, requester);
        (hit.map(block_to_tuple), latency)
    }

    /// Looks up `addr` without side effects.
    #[pyo3(signature = (addr, secure=false))]
    fn find(&self, addr: Addr, secure: bool) -> Option<(usize, usize)> {
        self.inner.store.find_block(addr, secure).map(block_to_tuple)
    }

    /// Chooses the victim for a miss on `addr`, or `None` if no way is allocatable.
    ///
    /// Pass the result to `insert` exactly once.
    fn find_victim(&mut self, addr: Addr) -> Option<(usize, usize)> {
        self.inner.store.find_victim(addr).map(block_to_tuple)
    }

    /// Installs `addr` into the victim `(set, way)`.
    ///
    /// Returns the displaced block as `(addr, dirty, secure)`, if any.
    ///
    /// # Errors
    ///
    /// Raises `IndexError` for an out-of-range victim and `ValueError` if the victim
    /// is not in the set `addr` maps to or outside the allocatable ways.
    #[pyo3(signature = (addr, victim, is_write=false, is_writeback=false, secure=false))]
    fn insert(
        &mut self,
        addr: Addr,
        victim: (usize, usize),
        is_write: bool,
        is_writeback: bool,
        secure: bool,
    ) -> PyResult<Option<(u64, bool, bool)>> {
        let id = self.block_id(victim.0, victim.1)?;
        let store = &mut self.inner.store;
        if store.extract_set(addr) != id.set || id.way >= store.alloc_assoc() {
            return Err(PyValueError::new_err(format!(
                "({}, {}) is not a valid victim for {addr:#x}",
                id.set, id.way
            )));
        }
        let request = FillRequest {
            addr,
            secure,
            is_write,
            is_writeback,
        };
        Ok(store.insert_block(&request, id).map(eviction_to_tuple))
    }

    /// Invalidates the block holding `addr`. Returns whether a block was found.
    #[pyo3(signature = (addr, secure=false))]
    fn invalidate(&mut self, addr: Addr, secure: bool) -> bool {
        let store = &mut self.inner.store;
        store.find_block(addr, secure).is_some_and(|id| {
            store.invalidate(id);
            true
        })
    }

    /// Invalidates every block, returning the dirty ones as `(addr, dirty, secure)`.
    fn invalidate_all(&mut self) -> Vec<(u64, bool, bool)> {
        self.inner
            .store
            .invalidate_all()
            .into_iter()
            .map(eviction_to_tuple)
            .collect()
    }

    /// Recency order of `set`, most valuable way first.
    ///
    /// # Errors
    ///
    /// Raises `IndexError` for an out-of-range set.
    fn recency(&self, set: usize) -> PyResult<Vec<usize>> {
        if set >= self.inner.store.num_sets() {
            return Err(PyIndexError::new_err(format!("set {set} out of range")));
        }
        Ok(self.inner.store.recency(set))
    }

    /// Applies one trace record: `op` is `"R"`, `"W"`, `"B"` or `"I"`.
    ///
    /// Returns `True` on a hit.
    ///
    /// # Errors
    ///
    /// Raises `ValueError` for an unknown operation.
    fn step(&mut self, op: &str, addr: Addr) -> PyResult<bool> {
        let record = match op.to_ascii_uppercase().as_str() {
            "R" => TraceOp::Read(addr),
            "W" => TraceOp::Write(addr),
            "B" | "WB" => TraceOp::Writeback(addr),
            "I" => TraceOp::Invalidate(addr),
            _ => return Err(PyValueError::new_err(format!("unknown operation '{op}'"))),
        };
        Ok(self.inner.step(record).hit)
    }

    /// Replays the trace file at `path` and returns the statistics.
    ///
    /// # Errors
    ///
    /// Raises `RuntimeError` if the trace cannot be read or parsed.
    fn run_trace(&mut self, py: Python<'_>, path: &str) -> PyResult<PyStats> {
        let ops = load_trace(path).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        py.check_signals()?;
        Ok(PyStats::from(self.inner.run(ops).clone()))
    }

    /// Dirty evictions seen by `step` and `run_trace`.
    #[getter]
    fn writebacks(&self) -> u64 {
        self.inner.writebacks()
    }

    /// Snapshot of the current statistics.
    fn get_stats(&self) -> PyStats {
        PyStats::from(self.inner.stats().clone())
    }

    /// Clears event counters.
    fn reset_stats(&mut self) {
        self.inner.store.reset_stats();
    }
}
