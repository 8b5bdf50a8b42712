//! Utility functions exposed to Python.
//!
//! Provides the version string and a switch for the core crate's `tracing` output.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the package version string.
#[pyfunction]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Routes tag store log events to stderr.
///
/// # Arguments
///
/// * `filter` - An `EnvFilter` directive such as `"tagsim_core=debug"`. Defaults to
///   the `RUST_LOG` environment variable, then `"warn"`.
///
/// # Returns
///
/// `True` if logging was installed, `False` if a subscriber was already active.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn init_logging(filter: Option<&str>) -> PyResult<bool> {
    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| PyValueError::new_err(format!("Invalid log filter: {e}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}
