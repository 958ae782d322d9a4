// src/dag/validate.rs

//! Structural validation of a [`TaskGraph`].

use tracing::debug;

use crate::dag::graph::{DfsFrame, TaskGraph, TaskName};
use crate::errors::{Result, TaskdagError};

/// Run all structural checks against a graph.
///
/// This checks:
/// - every dependency refers to a task in the graph
/// - the dependency relation has no cycle (self-dependencies included)
///
/// References are checked first; the cycle search never follows a dangling
/// name, so it is safe to run on a graph that failed the first check.
pub fn validate(graph: &TaskGraph) -> Result<()> {
    check_references(graph)?;

    if let Some(cycle) = find_cycle(graph) {
        return Err(TaskdagError::CyclicDependency { cycle });
    }

    debug!(tasks = graph.len(), "task graph is valid");
    Ok(())
}

/// Report the first dependency (in task order) that names no task.
pub fn check_references(graph: &TaskGraph) -> Result<()> {
    for task in graph.tasks() {
        for dep in &task.dependencies {
            if !graph.contains(dep) {
                return Err(TaskdagError::InvalidDependency {
                    task: task.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Depth-first marking of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Unvisited,
    /// On the current DFS path; reaching it again closes a cycle.
    OnStack,
    /// Fully explored, known not to lead back into the current path.
    Done,
}

/// Find one cycle, if any.
///
/// The returned path follows dependency edges and ends on the task it
/// started with, e.g. `["A", "B", "A"]` when A depends on B and B on A, or
/// `["A", "A"]` for a self-dependency.
pub fn find_cycle(graph: &TaskGraph) -> Option<Vec<TaskName>> {
    search(graph).0
}

/// Iterative three-colour DFS over every node (the graph may be a forest).
///
/// Returns the first cycle found and the final per-node marks.
pub(crate) fn search(graph: &TaskGraph) -> (Option<Vec<TaskName>>, Vec<VisitState>) {
    let mut marks = vec![VisitState::Unvisited; graph.len()];

    for root in 0..graph.len() {
        if marks[root] != VisitState::Unvisited {
            continue;
        }

        let mut stack = vec![DfsFrame::new(graph, root)];
        marks[root] = VisitState::OnStack;

        while let Some(frame) = stack.last_mut() {
            match frame.next_dep() {
                Some(dep) => match marks[dep] {
                    VisitState::Unvisited => {
                        marks[dep] = VisitState::OnStack;
                        stack.push(DfsFrame::new(graph, dep));
                    }
                    VisitState::OnStack => {
                        let from = stack.iter().position(|f| f.node == dep).unwrap_or(0);
                        let mut cycle: Vec<TaskName> = stack[from..]
                            .iter()
                            .map(|f| graph.task_at(f.node).name.clone())
                            .collect();
                        cycle.push(graph.task_at(dep).name.clone());
                        debug!(?cycle, "dependency cycle found");
                        return (Some(cycle), marks);
                    }
                    VisitState::Done => {}
                },
                None => {
                    let node = frame.node;
                    marks[node] = VisitState::Done;
                    stack.pop();
                }
            }
        }
    }

    (None, marks)
}
