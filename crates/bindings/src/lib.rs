//! Python bindings for the cache tag store.
//!
//! This crate exposes the tag store to Python via PyO3. It provides:
//! 1. **Tag store:** `PyTagStore` for per-operation access and trace replay.
//! 2. **Statistics:** `PyStats` for counters and selective section printing.
//! 3. **Utilities:** Version string, log setup, and conversion helpers for Python↔Rust types.

use pyo3::prelude::*;

/// Python dict to Rust `TagStoreConfig` conversion.
pub mod conversion;
/// Statistics binding (`PyStats`).
pub mod stats;
/// Tag store binding (`PyTagStore`).
pub mod tag_store;
/// Utility functions (version, logging).
pub mod utils;

/// Registers all classes and functions onto the given Python module.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_tagsim_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<tag_store::PyTagStore>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_tagsim_module(m)?;
    Ok(())
}
