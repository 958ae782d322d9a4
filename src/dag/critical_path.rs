// src/dag/critical_path.rs

//! Critical-path computation.
//!
//! `finish(t) = duration(t) + max(finish(dep))` (0 when `t` has no
//! dependencies). The largest finish time over the graph is the expected
//! runtime: the shortest possible makespan with unlimited workers and no
//! scheduling overhead.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::dag::graph::{DfsFrame, TaskGraph, TaskName};

/// Result of a critical-path computation.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    /// Earliest possible finish time of every task, in seconds.
    pub finish_times: BTreeMap<TaskName, f64>,
    /// Maximum finish time over all tasks (0 for an empty graph).
    pub expected_runtime: f64,
    /// The dominating dependency chain, first task to run first.
    pub path: Vec<TaskName>,
}

/// Expected runtime of a validated graph.
pub fn compute_expected_runtime(graph: &TaskGraph) -> f64 {
    critical_path(graph).expected_runtime
}

/// Compute finish times and the critical path of a validated graph.
///
/// Memoisation lives in this call only. On a graph that was never validated,
/// dangling dependencies count as 0 and back edges are ignored, so the call
/// still terminates (with a meaningless result).
pub fn critical_path(graph: &TaskGraph) -> CriticalPath {
    let n = graph.len();
    let mut finish: Vec<Option<f64>> = vec![None; n];
    let mut via: Vec<Option<usize>> = vec![None; n];
    // Number of tasks on the dominating chain ending at each node.
    let mut chain: Vec<usize> = vec![0; n];
    let mut on_stack = vec![false; n];

    for root in 0..n {
        if finish[root].is_some() {
            continue;
        }

        let mut stack = vec![DfsFrame::new(graph, root)];
        on_stack[root] = true;

        while let Some(frame) = stack.last_mut() {
            if let Some(dep) = frame.next_dep() {
                if finish[dep].is_none() {
                    if on_stack[dep] {
                        warn!(
                            task = %graph.task_at(frame.node).name,
                            dep = %graph.task_at(dep).name,
                            "back edge in unvalidated graph; ignoring"
                        );
                    } else {
                        on_stack[dep] = true;
                        stack.push(DfsFrame::new(graph, dep));
                    }
                }
                continue;
            }

            // Every dependency is resolved; settle this node.
            let node = frame.node;
            let mut longest: Option<(usize, f64)> = None;
            for &dep in frame.deps() {
                if let Some(f) = finish[dep] {
                    if longest.is_none_or(|(best, best_f)| {
                        dominates((f, chain[dep]), (best_f, chain[best]))
                    }) {
                        longest = Some((dep, f));
                    }
                }
            }

            finish[node] = Some(graph.task_at(node).duration + longest.map_or(0.0, |(_, f)| f));
            chain[node] = 1 + longest.map_or(0, |(dep, _)| chain[dep]);
            via[node] = longest.map(|(dep, _)| dep);
            on_stack[node] = false;
            stack.pop();
        }
    }

    let mut last: Option<(usize, f64)> = None;
    for (i, f) in finish.iter().enumerate() {
        let f = f.unwrap_or(0.0);
        if last.is_none_or(|(best, best_f)| dominates((f, chain[i]), (best_f, chain[best]))) {
            last = Some((i, f));
        }
    }

    let mut path = Vec::new();
    let mut cursor = last.map(|(i, _)| i);
    while let Some(i) = cursor {
        path.push(graph.task_at(i).name.clone());
        cursor = via[i];
    }
    path.reverse();

    let expected_runtime = last.map_or(0.0, |(_, f)| f);
    debug!(expected_runtime, ?path, "critical path computed");

    let finish_times = graph
        .tasks()
        .zip(finish)
        .map(|(task, f)| (task.name.clone(), f.unwrap_or(0.0)))
        .collect();

    CriticalPath {
        finish_times,
        expected_runtime,
        path,
    }
}

/// Later finish wins; on equal finish times the longer chain wins, so
/// zero-duration tasks at the end of a chain stay on the path.
fn dominates((finish, chain): (f64, usize), (best_finish, best_chain): (f64, usize)) -> bool {
    finish > best_finish || (finish == best_finish && chain > best_chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskRecord;

    fn graph(tasks: &[(&str, f64, &[&str])]) -> TaskGraph {
        TaskGraph::from_records(tasks.iter().map(|(name, duration, deps)| {
            TaskRecord::new(*name, *duration, deps.iter().map(|d| d.to_string()).collect())
        }))
    }

    #[test]
    fn empty_graph_has_zero_runtime() {
        let cp = critical_path(&TaskGraph::default());
        assert_eq!(cp.expected_runtime, 0.0);
        assert!(cp.path.is_empty());
        assert!(cp.finish_times.is_empty());
    }

    #[test]
    fn longest_branch_dominates() {
        let g = graph(&[("A", 2.0, &[]), ("B", 3.0, &["A"]), ("C", 1.0, &["A"])]);

        let cp = critical_path(&g);

        assert_eq!(cp.expected_runtime, 5.0);
        assert_eq!(cp.path, vec!["A", "B"]);
        assert_eq!(cp.finish_times["C"], 3.0);
    }

    #[test]
    fn independent_tasks_take_the_max_not_the_sum() {
        let g = graph(&[("A", 2.0, &[]), ("B", 3.0, &[]), ("C", 5.0, &[])]);
        assert_eq!(compute_expected_runtime(&g), 5.0);
    }

    #[test]
    fn shared_dependency_is_counted_once_per_path() {
        // A feeds both B and C; D joins them.
        let g = graph(&[
            ("D", 1.0, &["B", "C"]),
            ("B", 4.0, &["A"]),
            ("C", 2.0, &["A"]),
            ("A", 1.5, &[]),
        ]);

        let cp = critical_path(&g);

        assert_eq!(cp.expected_runtime, 6.5);
        assert_eq!(cp.path, vec!["A", "B", "D"]);
    }

    #[test]
    fn tied_finish_prefers_the_longer_chain() {
        let g = graph(&[
            ("build", 2.0, &[]),
            ("publish", 0.0, &["build"]),
            ("notify", 0.0, &["publish"]),
        ]);

        let cp = critical_path(&g);

        assert_eq!(cp.expected_runtime, 2.0);
        assert_eq!(cp.path, vec!["build", "publish", "notify"]);
    }

    #[test]
    fn tied_dependencies_follow_the_longer_chain() {
        // Both "short" and "tail" finish at 3.0; "tail" ends a longer chain.
        let g = graph(&[
            ("short", 3.0, &[]),
            ("head", 3.0, &[]),
            ("tail", 0.0, &["head"]),
            ("sink", 1.0, &["short", "tail"]),
        ]);

        let cp = critical_path(&g);

        assert_eq!(cp.expected_runtime, 4.0);
        assert_eq!(cp.path, vec!["head", "tail", "sink"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let g = graph(&[("A", 0.5, &[]), ("B", 0.25, &["A"]), ("C", 1.0, &[])]);
        assert_eq!(critical_path(&g), critical_path(&g));
    }

    #[test]
    fn unvalidated_cycle_still_terminates() {
        let g = graph(&[("A", 1.0, &["B"]), ("B", 1.0, &["A"])]);
        let cp = critical_path(&g);
        assert_eq!(cp.finish_times.len(), 2);
    }
}
