//! Python↔Rust conversion helpers.
//!
//! Python dicts are converted into the core `TagStoreConfig` via JSON serialization,
//! so the same schema is used from both Python and the CLI. Tag store handles and
//! evictions go back to Python as plain tuples.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tagsim_core::TagStoreConfig;
use tagsim_core::cache::{BlockId, Eviction};

/// Converts a Python dict to a validated `TagStoreConfig`.
///
/// The dict is serialized with `json.dumps` and parsed with
/// [`TagStoreConfig::from_json`]. Missing keys take their defaults.
///
/// # Arguments
///
/// * `py` - Python interpreter handle.
/// * `dict` - A Python dict such as `{"size_bytes": 32768, "assoc": 8, "policy": "TRRIP"}`.
///
/// # Returns
///
/// The configuration, or a `ValueError` if the dict is malformed or fails validation.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<TagStoreConfig> {
    let json = py.import("json")?;
    let dumps = json.getattr("dumps")?;
    let json_str: String = dumps.call1((dict,))?.extract()?;

    TagStoreConfig::from_json(&json_str)
        .map_err(|e| PyValueError::new_err(format!("Invalid config: {e}")))
}

/// `(set, way)` tuple for a block handle.
pub const fn block_to_tuple(id: BlockId) -> (usize, usize) {
    (id.set, id.way)
}

/// `(addr, dirty, secure)` tuple for an eviction.
pub const fn eviction_to_tuple(eviction: Eviction) -> (u64, bool, bool) {
    (eviction.addr, eviction.dirty, eviction.secure)
}
