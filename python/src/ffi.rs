//! ffi.rs
//! Export/import entry points exposed to Python.
//!
//! The vault crosses the boundary as JSON text and is carried through the
//! pipeline as raw JSON, so key order and number spelling survive. Failures raise
//! `pixelvault.BackupError` with a message of the form `"<Kind>: <detail>"`.

use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use serde_json::value::RawValue;

use pixelvault_core::config::CodecConfig;
use pixelvault_core::pipeline;
use pixelvault_core::progress::{ProgressEvent, ProgressReporter};
use pixelvault_core::types::BackupError as CoreError;

create_exception!(pixelvault, BackupError, PyException);

fn to_py_err(e: CoreError) -> PyErr {
    BackupError::new_err(format!("{}: {}", e.kind(), e))
}

fn load_config(config_json: Option<&str>) -> PyResult<CodecConfig> {
    match config_json {
        Some(json) => CodecConfig::from_json(json).map_err(to_py_err),
        None => Ok(CodecConfig::default()),
    }
}

/// Wrap an optional Python callable `(phase, processed, total, percent)`.
/// The pipeline applies `progress_interval_ms` when a run starts.
fn make_reporter(callback: Option<PyObject>) -> ProgressReporter<'static> {
    match callback {
        None => ProgressReporter::silent(),
        Some(cb) => ProgressReporter::new(move |e: &ProgressEvent| {
            Python::with_gil(|py| {
                let args = (e.phase.as_str(), e.processed_bytes, e.total_bytes, e.percent);
                // a failing callback must not abort the run
                if let Err(err) = cb.call1(py, args) {
                    err.print(py);
                }
            });
        }),
    }
}

/// export_backup(vault_json, password, progress=None, config_json=None) -> bytes
#[pyfunction]
#[pyo3(signature = (vault_json, password, progress=None, config_json=None))]
fn export_backup<'py>(
    py: Python<'py>,
    vault_json: &str,
    password: &str,
    progress: Option<PyObject>,
    config_json: Option<&str>,
) -> PyResult<Bound<'py, PyBytes>> {
    let config = load_config(config_json)?;
    let vault: Box<RawValue> = serde_json::from_str(vault_json)
        .map_err(|e| to_py_err(CoreError::from(e)))?;

    let mut reporter = make_reporter(progress);
    let png = pipeline::export_backup(&vault, password, &config, &mut reporter).map_err(to_py_err)?;
    Ok(PyBytes::new_bound(py, &png))
}

/// import_backup(data, password, progress=None, config_json=None) -> str
#[pyfunction]
#[pyo3(signature = (data, password, progress=None, config_json=None))]
fn import_backup(
    data: &[u8],
    password: &str,
    progress: Option<PyObject>,
    config_json: Option<&str>,
) -> PyResult<String> {
    let config = load_config(config_json)?;
    let mut reporter = make_reporter(progress);
    let vault: Box<RawValue> =
        pipeline::import_backup(data, password, &config, &mut reporter).map_err(to_py_err)?;
    Ok(vault.get().to_owned())
}

pub fn register(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("BackupError", py.get_type_bound::<BackupError>())?;
    m.add_function(wrap_pyfunction!(export_backup, m)?)?;
    m.add_function(wrap_pyfunction!(import_backup, m)?)?;
    Ok(())
}
