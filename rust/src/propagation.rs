//! Forward and backward passes over the task graph.
//!
//! Both passes walk a topological order, so each node is finalized exactly
//! once after all of its parents (forward) or children (backward).

use crate::graph::{GraphError, TaskGraph};
use crate::index::NodeId;
use crate::{log_checks, log_debug};

/// A half-open occupation `[start, finish)` of one task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: u64,
    pub finish: u64,
}

/// Early and late spans for every node, indexed by `NodeId`.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    pub early: Vec<Span>,
    pub late: Vec<Span>,
    /// Longest duration-weighted path through the graph.
    pub total_duration: u64,
}

impl Schedule {
    /// Late start minus early start.
    pub fn slack(&self, id: NodeId) -> u64 {
        self.late[id].start - self.early[id].start
    }
}

/// Compute earliest start/finish for every node.
///
/// Roots start at 0; any other node starts at the latest early finish among
/// its parents. Returns the spans and the total duration, which is the
/// greatest early finish over the leaves (0 for an empty graph).
pub fn forward_pass(graph: &TaskGraph<'_>, order: &[NodeId], verbosity: u8) -> (Vec<Span>, u64) {
    let mut early = vec![Span::default(); graph.len()];

    for &id in order {
        let node = graph.node(id);
        let start = node
            .parents
            .iter()
            .map(|&parent| early[parent].finish)
            .max()
            .unwrap_or(0);
        early[id] = Span {
            start,
            finish: start + node.duration(),
        };

        log_debug!(
            verbosity,
            "Early interval for {}: {}-{}",
            node.code(),
            start,
            early[id].finish
        );
    }

    let total_duration = graph
        .leaves()
        .map(|id| early[id].finish)
        .max()
        .unwrap_or(0);

    log_checks!(
        verbosity,
        "Forward pass complete: total duration {}",
        total_duration
    );

    (early, total_duration)
}

/// Compute latest start/finish for every node given the total duration.
///
/// Leaves finish at `total_duration`; any other node finishes at the
/// earliest late start among its children.
pub fn backward_pass(
    graph: &TaskGraph<'_>,
    order: &[NodeId],
    total_duration: u64,
    verbosity: u8,
) -> Vec<Span> {
    let mut late = vec![Span::default(); graph.len()];

    for &id in order.iter().rev() {
        let node = graph.node(id);
        let finish = node
            .children
            .iter()
            .map(|&child| late[child].start)
            .min()
            .unwrap_or(total_duration);
        late[id] = Span {
            start: finish - node.duration(),
            finish,
        };

        log_debug!(
            verbosity,
            "Late interval for {}: {}-{}",
            node.code(),
            late[id].start,
            finish
        );
    }

    log_checks!(verbosity, "Backward pass complete: {} nodes", late.len());

    late
}

/// Order the graph and run both passes.
///
/// # Errors
/// * `CircularDependency` if the graph is not acyclic
pub fn propagate(graph: &TaskGraph<'_>, verbosity: u8) -> Result<Schedule, GraphError> {
    let order = graph.topological_order()?;
    let (early, total_duration) = forward_pass(graph, &order, verbosity);
    let late = backward_pass(graph, &order, total_duration, verbosity);

    Ok(Schedule {
        early,
        late,
        total_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::logging::VERBOSITY_SILENT;
    use crate::models::TaskRecord;

    fn make_record(code: &str, duration: u32, deps: &[&str]) -> TaskRecord {
        TaskRecord::new(code, duration).with_dependencies(deps.iter().copied())
    }

    fn schedule_for(records: &[TaskRecord]) -> (TaskGraph<'_>, Schedule) {
        let graph = TaskGraph::build(records, DuplicatePolicy::Reject, VERBOSITY_SILENT).unwrap();
        let schedule = propagate(&graph, VERBOSITY_SILENT).unwrap();
        (graph, schedule)
    }

    #[test]
    fn test_empty_graph_has_zero_duration() {
        let (_, schedule) = schedule_for(&[]);
        assert_eq!(schedule.total_duration, 0);
        assert!(schedule.early.is_empty());
        assert!(schedule.late.is_empty());
    }

    #[test]
    fn test_chain() {
        // a -> b -> c, all critical
        let records = vec![
            make_record("a", 2, &[]),
            make_record("b", 3, &["a"]),
            make_record("c", 4, &["b"]),
        ];
        let (_, schedule) = schedule_for(&records);

        assert_eq!(schedule.total_duration, 9);
        assert_eq!(schedule.early[2], Span { start: 5, finish: 9 });
        assert_eq!(schedule.late[0], Span { start: 0, finish: 2 });
        assert!((0..3).all(|id| schedule.slack(id) == 0));
    }

    #[test]
    fn test_parallel_paths_with_slack() {
        // a (2) and b (5) both feed target (1); a has 3 units of slack
        let records = vec![
            make_record("a", 2, &[]),
            make_record("b", 5, &[]),
            make_record("target", 1, &["a", "b"]),
        ];
        let (graph, schedule) = schedule_for(&records);

        let a = graph.id_of("a").unwrap();
        let b = graph.id_of("b").unwrap();
        let target = graph.id_of("target").unwrap();

        assert_eq!(schedule.total_duration, 6);
        assert_eq!(schedule.slack(a), 3);
        assert_eq!(schedule.slack(b), 0);
        assert_eq!(schedule.early[target], Span { start: 5, finish: 6 });
        assert_eq!(schedule.late[a], Span { start: 3, finish: 5 });
    }

    #[test]
    fn test_disconnected_leaf_finishes_at_total_duration() {
        // short is unrelated to the long chain but still ends at the project end
        let records = vec![
            make_record("long1", 4, &[]),
            make_record("long2", 4, &["long1"]),
            make_record("short", 1, &[]),
        ];
        let (graph, schedule) = schedule_for(&records);
        let short = graph.id_of("short").unwrap();

        assert_eq!(schedule.total_duration, 8);
        assert_eq!(schedule.late[short], Span { start: 7, finish: 8 });
        assert_eq!(schedule.slack(short), 7);
    }

    #[test]
    fn test_zero_duration_milestone() {
        let records = vec![
            make_record("a", 3, &[]),
            make_record("milestone", 0, &["a"]),
            make_record("b", 2, &["milestone"]),
        ];
        let (graph, schedule) = schedule_for(&records);
        let m = graph.id_of("milestone").unwrap();

        assert_eq!(schedule.early[m], Span { start: 3, finish: 3 });
        assert_eq!(schedule.late[m], Span { start: 3, finish: 3 });
        assert_eq!(schedule.total_duration, 5);
    }

    #[test]
    fn test_edge_and_duration_invariants() {
        let records = vec![
            make_record("a1", 2, &[]),
            make_record("a2", 3, &[]),
            make_record("b", 4, &["a1", "a2"]),
            make_record("c", 2, &["a2"]),
            make_record("d", 5, &["b"]),
            make_record("e", 1, &["c"]),
            make_record("f", 2, &["c"]),
            make_record("g", 4, &["d", "e"]),
            make_record("h1", 3, &["f", "g"]),
            make_record("h2", 1, &["f"]),
        ];
        let (graph, schedule) = schedule_for(&records);

        for (id, node) in graph.nodes().iter().enumerate() {
            let (early, late) = (schedule.early[id], schedule.late[id]);
            assert_eq!(early.finish, early.start + node.duration());
            assert_eq!(late.finish - late.start, node.duration());
            assert!(early.start <= late.start);
            for &child in &node.children {
                assert!(early.finish <= schedule.early[child].start);
                assert!(late.finish <= schedule.late[child].start);
            }
        }

        let leaf_finishes: Vec<u64> = graph.leaves().map(|id| schedule.early[id].finish).collect();
        assert!(leaf_finishes.iter().all(|&f| f <= schedule.total_duration));
        assert!(leaf_finishes.contains(&schedule.total_duration));
        assert!(graph.roots().any(|id| schedule.late[id].start == 0));
    }

    #[test]
    fn test_cycle_is_reported_not_propagated() {
        let records = vec![make_record("a", 1, &["b"]), make_record("b", 1, &["a"])];
        let graph =
            TaskGraph::build(&records, DuplicatePolicy::Reject, VERBOSITY_SILENT).unwrap();

        assert!(matches!(
            propagate(&graph, VERBOSITY_SILENT),
            Err(GraphError::CircularDependency(_))
        ));
    }
}
