//! Task graph construction.
//!
//! Turns the flat record list into an arena of nodes linked in both
//! directions (parents = dependencies, children = dependents).

use std::collections::VecDeque;
use thiserror::Error;

use crate::config::DuplicatePolicy;
use crate::index::{NodeId, TaskIndex};
use crate::log_changes;
use crate::models::TaskRecord;

/// Errors raised while building or ordering the task graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: String, dependency: String },
    #[error("Duplicate task code: {0}")]
    DuplicateTask(String),
    #[error("Circular dependency detected among tasks: {}", .0.join(", "))]
    CircularDependency(Vec<String>),
}

/// One task in the graph. Edges are fixed once the graph is built.
#[derive(Debug, Clone)]
pub struct TaskNode<'a> {
    pub record: &'a TaskRecord,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
}

impl TaskNode<'_> {
    #[inline]
    pub fn code(&self) -> &str {
        &self.record.task_code
    }

    #[inline]
    pub fn duration(&self) -> u64 {
        u64::from(self.record.duration)
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Dependency DAG over borrowed task records. Node ids follow input order.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph<'a> {
    index: TaskIndex<'a>,
    nodes: Vec<TaskNode<'a>>,
}

impl<'a> TaskGraph<'a> {
    /// Build the graph from records, wiring one parent -> child edge per dependency.
    ///
    /// # Errors
    /// * `DuplicateTask` if a code repeats and the policy is `Reject`
    /// * `UnknownDependency` if a dependency names no task in `records`
    pub fn build(
        records: &'a [TaskRecord],
        policy: DuplicatePolicy,
        verbosity: u8,
    ) -> Result<Self, GraphError> {
        let mut index = TaskIndex::with_capacity(records.len());
        let mut nodes: Vec<TaskNode<'a>> = Vec::with_capacity(records.len());

        for record in records {
            match index.insert(&record.task_code) {
                Ok(_) => nodes.push(TaskNode {
                    record,
                    parents: Vec::new(),
                    children: Vec::new(),
                }),
                Err(_) if policy == DuplicatePolicy::KeepFirst => {
                    log_changes!(
                        verbosity,
                        "Dropping duplicate record for task {}",
                        record.task_code
                    );
                }
                Err(_) => return Err(GraphError::DuplicateTask(record.task_code.clone())),
            }
        }

        for child in 0..nodes.len() {
            let record = nodes[child].record;
            for dependency in &record.dependencies {
                let parent =
                    index
                        .get(dependency)
                        .ok_or_else(|| GraphError::UnknownDependency {
                            task: record.task_code.clone(),
                            dependency: dependency.clone(),
                        })?;
                // Repeated dependency codes collapse into one edge
                if nodes[child].parents.contains(&parent) {
                    continue;
                }
                nodes[child].parents.push(parent);
                nodes[parent].children.push(child);
            }
        }

        log_changes!(
            verbosity,
            "Built task graph: {} nodes from {} records",
            nodes.len(),
            records.len()
        );

        Ok(Self { index, nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TaskNode<'a> {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[TaskNode<'a>] {
        &self.nodes
    }

    pub fn id_of(&self, code: &str) -> Option<NodeId> {
        self.index.get(code)
    }

    /// Nodes with no dependencies, in input order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.nodes[id].is_root())
    }

    /// Nodes nothing depends on, in input order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.nodes[id].is_leaf())
    }

    /// Order nodes so every parent precedes its children (Kahn's algorithm).
    ///
    /// Fails with `CircularDependency` naming every node that could not be
    /// ordered, i.e. the nodes on or downstream of a cycle.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, GraphError> {
        let mut in_degree: Vec<usize> = self.nodes.iter().map(|n| n.parents.len()).collect();
        let mut queue: VecDeque<NodeId> = self.roots().collect();
        let mut order: Vec<NodeId> = Vec::with_capacity(self.nodes.len());

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &child in &self.nodes[id].children {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck: Vec<String> = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &degree)| degree > 0)
                .filter_map(|(id, _)| self.index.resolve(id))
                .map(str::to_string)
                .collect();
            return Err(GraphError::CircularDependency(stuck));
        }

        Ok(order)
    }
}
