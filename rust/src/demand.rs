//! Peak crew demand over the early-start schedule.

use std::collections::BTreeMap;

use crate::graph::TaskGraph;
use crate::propagation::Span;
use crate::log_checks;

/// Highest sum of crew assignments of tasks running at the same time.
///
/// Tasks are swept by early start. Each task occupies `[start, finish)`, so a
/// task finishing exactly when another starts does not overlap it. The set
/// of running tasks is ordered by (early finish, task code) so finished tasks
/// are always at its front.
pub fn peak_demand(graph: &TaskGraph<'_>, early: &[Span], verbosity: u8) -> u64 {
    let mut by_start: Vec<usize> = (0..graph.len()).collect();
    by_start.sort_by_key(|&id| early[id].start);

    let mut active: BTreeMap<(u64, &str), u64> = BTreeMap::new();
    let mut current: u64 = 0;
    let mut highest: u64 = 0;

    for id in by_start {
        let span = early[id];

        while let Some(entry) = active.first_entry() {
            if entry.key().0 > span.start {
                break;
            }
            current -= entry.remove();
        }

        let node = graph.node(id);
        let assignment = u64::from(node.record.crew.assignment);
        active.insert((span.finish, node.code()), assignment);
        current += assignment;

        if current > highest {
            highest = current;
            log_checks!(
                verbosity,
                "New peak demand {} at t={} ({} tasks running)",
                highest,
                span.start,
                active.len()
            );
        }
    }

    highest
}
