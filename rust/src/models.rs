//! Core data types for the CPM engine.

use pyo3::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Resource assigned to a task: a crew name and how many units it occupies.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    #[pyo3(get, set)]
    #[serde(default)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub assignment: u32,
}

impl Crew {
    pub fn new(name: impl Into<String>, assignment: u32) -> Self {
        Self {
            name: name.into(),
            assignment,
        }
    }
}

#[pymethods]
impl Crew {
    #[new]
    #[pyo3(signature = (name, assignment=0))]
    fn py_new(name: String, assignment: u32) -> Self {
        Self { name, assignment }
    }

    fn __repr__(&self) -> String {
        format!("Crew(name={:?}, assignment={})", self.name, self.assignment)
    }
}

/// A task as delivered by the loader. Immutable input to the engine.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[pyo3(get, set)]
    pub task_code: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub operation_name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub element_name: String,
    #[pyo3(get, set)]
    pub duration: u32,
    #[pyo3(get, set)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Crew,
    /// Codes of the tasks that must finish before this one starts.
    #[pyo3(get, set)]
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: Vec<String>,
}

impl TaskRecord {
    /// Creates a record with no labels, no crew and no dependencies.
    pub fn new(task_code: impl Into<String>, duration: u32) -> Self {
        Self {
            task_code: task_code.into(),
            duration,
            ..Self::default()
        }
    }

    /// Sets the operation and element labels.
    pub fn with_labels(
        mut self,
        operation_name: impl Into<String>,
        element_name: impl Into<String>,
    ) -> Self {
        self.operation_name = operation_name.into();
        self.element_name = element_name.into();
        self
    }

    /// Sets the crew.
    pub fn with_crew(mut self, crew: Crew) -> Self {
        self.crew = crew;
        self
    }

    /// Sets the dependency codes.
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

#[pymethods]
impl TaskRecord {
    #[new]
    #[pyo3(signature = (
        task_code,
        duration,
        operation_name=String::new(),
        element_name=String::new(),
        crew=None,
        dependencies=None
    ))]
    fn py_new(
        task_code: String,
        duration: u32,
        operation_name: String,
        element_name: String,
        crew: Option<Crew>,
        dependencies: Option<Vec<String>>,
    ) -> Self {
        Self {
            task_code,
            operation_name,
            element_name,
            duration,
            crew: crew.unwrap_or_default(),
            dependencies: dependencies.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskRecord(task_code={:?}, duration={}, crew={}, deps={})",
            self.task_code,
            self.duration,
            self.crew.assignment,
            self.dependencies.len()
        )
    }
}

/// A pair of bounds on one instant of a task: earliest (`from`) and latest (`to`).
#[pyclass]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    // `from` is a Python keyword
    #[pyo3(get, name = "from_")]
    pub from: u64,
    #[pyo3(get)]
    pub to: u64,
}

impl Interval {
    pub fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }
}

#[pymethods]
impl Interval {
    fn __repr__(&self) -> String {
        format!("Interval({}, {})", self.from, self.to)
    }
}

/// A task annotated with its start and end intervals.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTask {
    #[pyo3(get)]
    pub record: TaskRecord,
    /// (early start, late start)
    #[pyo3(get)]
    pub start_interval: Interval,
    /// (early finish, late finish)
    #[pyo3(get)]
    pub end_interval: Interval,
}

#[pymethods]
impl ProjectTask {
    /// Total float: how far the start can slip without delaying the project.
    pub fn slack(&self) -> u64 {
        self.start_interval.to - self.start_interval.from
    }

    pub fn is_critical(&self) -> bool {
        self.slack() == 0
    }

    fn __repr__(&self) -> String {
        format!(
            "ProjectTask(task_code={:?}, start=({}, {}), end=({}, {}))",
            self.record.task_code,
            self.start_interval.from,
            self.start_interval.to,
            self.end_interval.from,
            self.end_interval.to
        )
    }
}

/// Whole-project figures without the per-task breakdown.
#[pyclass]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[pyo3(get)]
    pub total_duration: u64,
    #[pyo3(get)]
    pub highest_crew_assignment: u64,
}

#[pymethods]
impl ProjectSummary {
    fn __repr__(&self) -> String {
        format!(
            "ProjectSummary(total_duration={}, highest_crew_assignment={})",
            self.total_duration, self.highest_crew_assignment
        )
    }
}

/// Result of evaluating a set of task records.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[pyo3(get)]
    pub total_duration: u64,
    #[pyo3(get)]
    pub highest_crew_assignment: u64,
    /// One entry per evaluated record, in input order.
    #[pyo3(get)]
    pub tasks: Vec<ProjectTask>,
}

#[pymethods]
impl Project {
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            total_duration: self.total_duration,
            highest_crew_assignment: self.highest_crew_assignment,
        }
    }

    pub fn task(&self, task_code: &str) -> Option<ProjectTask> {
        self.tasks
            .iter()
            .find(|t| t.record.task_code == task_code)
            .cloned()
    }

    /// Codes of the zero-slack tasks, in input order.
    pub fn critical_tasks(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|t| t.is_critical())
            .map(|t| t.record.task_code.clone())
            .collect()
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(self)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __len__(&self) -> usize {
        self.tasks.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Project(total_duration={}, highest_crew_assignment={}, tasks={})",
            self.total_duration,
            self.highest_crew_assignment,
            self.tasks.len()
        )
    }
}
