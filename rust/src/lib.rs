//! Critical Path Method scheduling engine.
//!
//! Given a flat list of task records, computes every task's early/late start
//! and finish, the project's total duration, and the peak concurrent crew
//! demand over the early-start schedule. Exposed to Rust directly and to
//! Python through PyO3.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod config;
pub mod demand;
mod engine;
pub mod graph;
mod index;
pub mod loader;
pub mod logging;
mod models;
pub mod propagation;

pub use config::{DuplicatePolicy, EngineConfig};
pub use engine::{evaluate, CpmEngine, EngineError};
pub use graph::{GraphError, TaskGraph, TaskNode};
pub use index::{NodeId, TaskIndex};
pub use loader::LoaderError;
pub use models::{Crew, Interval, Project, ProjectSummary, ProjectTask, TaskRecord};

/// Evaluate a project with the Critical Path Method.
///
/// # Arguments
/// * `task_records` - Tasks in input order
/// * `config` - Engine configuration (defaults if omitted)
///
/// # Returns
/// * Project with total duration, highest crew assignment and per-task intervals
///
/// # Raises
/// * ValueError on unknown dependency, duplicate task code, circular
///   dependency or unknown duplicate policy
#[pyfunction]
#[pyo3(name = "evaluate", signature = (task_records, config=None))]
fn py_evaluate(task_records: Vec<TaskRecord>, config: Option<EngineConfig>) -> PyResult<Project> {
    let config = config.unwrap_or_default();
    match evaluate(&task_records, &config) {
        Ok(project) => Ok(project),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

fn loader_err_to_py(err: LoaderError) -> PyErr {
    match err {
        LoaderError::Io { .. } => pyo3::exceptions::PyIOError::new_err(err.to_string()),
        LoaderError::Parse(_) => pyo3::exceptions::PyValueError::new_err(err.to_string()),
    }
}

/// Load task records from a JSON file.
///
/// # Raises
/// * IOError if the file cannot be read
/// * ValueError if the content is not a valid task record array
#[pyfunction]
fn load_task_records(path: std::path::PathBuf) -> PyResult<Vec<TaskRecord>> {
    loader::load_from_path(path).map_err(loader_err_to_py)
}

/// Parse task records from a JSON string.
#[pyfunction]
fn load_task_records_json(text: &str) -> PyResult<Vec<TaskRecord>> {
    loader::load_from_str(text).map_err(loader_err_to_py)
}

/// The cpm_engine Python module.
#[pymodule]
fn cpm_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Crew>()?;
    m.add_class::<TaskRecord>()?;
    m.add_class::<Interval>()?;
    m.add_class::<ProjectTask>()?;
    m.add_class::<ProjectSummary>()?;
    m.add_class::<Project>()?;

    // Config types
    m.add_class::<EngineConfig>()?;

    // Entry points
    m.add_function(wrap_pyfunction!(py_evaluate, m)?)?;
    m.add_function(wrap_pyfunction!(load_task_records, m)?)?;
    m.add_function(wrap_pyfunction!(load_task_records_json, m)?)?;

    Ok(())
}
