//! CPM engine: builds the graph, propagates intervals and assembles the project.

use thiserror::Error;

use crate::config::EngineConfig;
use crate::demand::peak_demand;
use crate::graph::{GraphError, TaskGraph};
use crate::log_changes;
use crate::models::{Interval, Project, ProjectTask, TaskRecord};
use crate::propagation::propagate;

/// Errors that abort an evaluation. No partial project is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("Unknown duplicate policy: {0}")]
    UnknownDuplicatePolicy(String),
}

/// Critical Path Method engine.
///
/// Holds only configuration; every call to `evaluate` builds and discards
/// its own graph, so one engine can serve concurrent callers.
#[derive(Clone, Debug, Default)]
pub struct CpmEngine {
    config: EngineConfig,
}

impl CpmEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the project summary and start/end intervals of every task.
    ///
    /// # Returns
    /// * `Ok(Project)` with tasks in input order
    /// * `Err(EngineError)` on an unknown dependency, duplicate code, cycle,
    ///   or invalid configuration
    pub fn evaluate(&self, records: &[TaskRecord]) -> Result<Project, EngineError> {
        let verbosity = self.config.verbosity;
        let policy = self
            .config
            .duplicate_policy()
            .map_err(EngineError::UnknownDuplicatePolicy)?;

        let graph = TaskGraph::build(records, policy, verbosity)?;
        let schedule = propagate(&graph, verbosity)?;
        let highest_crew_assignment = peak_demand(&graph, &schedule.early, verbosity);

        let tasks: Vec<ProjectTask> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, node)| {
                let (early, late) = (schedule.early[id], schedule.late[id]);
                ProjectTask {
                    record: node.record.clone(),
                    start_interval: Interval::new(early.start, late.start),
                    end_interval: Interval::new(early.finish, late.finish),
                }
            })
            .collect();

        log_changes!(
            verbosity,
            "Evaluated project: {} tasks, total duration {}, highest crew assignment {}",
            tasks.len(),
            schedule.total_duration,
            highest_crew_assignment
        );

        Ok(Project {
            total_duration: schedule.total_duration,
            highest_crew_assignment,
            tasks,
        })
    }
}

/// Evaluate `records` with the given configuration.
pub fn evaluate(records: &[TaskRecord], config: &EngineConfig) -> Result<Project, EngineError> {
    CpmEngine::new(config.clone()).evaluate(records)
}
