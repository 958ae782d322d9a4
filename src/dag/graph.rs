// src/dag/graph.rs

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::TaskRecord;

/// Public type alias for task names throughout the crate.
pub type TaskName = String;

/// A single node of the task graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: TaskName,
    /// Seconds of work.
    pub duration: f64,
    /// Direct dependencies, in input order, with blank tokens removed.
    pub dependencies: Vec<TaskName>,
}

impl Task {
    fn from_record(record: TaskRecord) -> Self {
        let dependencies = record
            .dependencies
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            name: record.name,
            duration: record.duration,
            dependencies,
        }
    }
}

/// In-memory task graph keyed by task name.
///
/// Tasks live in an arena (`Vec<Task>`) in first-insertion order, with a name
/// index on the side. Construction never checks references or acyclicity;
/// that is the job of [`crate::dag::validate`].
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    nodes: Vec<Task>,
    index: HashMap<TaskName, usize>,
}

impl TaskGraph {
    /// Build a graph from decoded records.
    ///
    /// A name defined twice keeps its original position but takes the later
    /// definition.
    pub fn from_records(records: impl IntoIterator<Item = TaskRecord>) -> Self {
        let mut graph = Self::default();

        for record in records {
            let task = Task::from_record(record);
            match graph.index.get(&task.name) {
                Some(&i) => {
                    warn!(task = %task.name, "task defined more than once; later definition wins");
                    graph.nodes[i] = task;
                }
                None => {
                    graph.index.insert(task.name.clone(), graph.nodes.len());
                    graph.nodes.push(task);
                }
            }
        }

        debug!(tasks = graph.nodes.len(), "task graph built");
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    /// All tasks in first-insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.nodes.iter()
    }

    /// Return all task names.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|t| t.name.as_str())
    }

    /// Immediate dependencies of a task. Unknown tasks have none.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.get(name)
            .map(|t| t.dependencies.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn task_at(&self, i: usize) -> &Task {
        &self.nodes[i]
    }

    /// Arena indices of the dependencies of node `i`, skipping dangling names.
    pub(crate) fn dependency_indices(&self, i: usize) -> Vec<usize> {
        self.nodes[i]
            .dependencies
            .iter()
            .filter_map(|d| self.index_of(d))
            .collect()
    }
}

/// One frame of an explicit depth-first stack over the arena.
pub(crate) struct DfsFrame {
    pub(crate) node: usize,
    deps: Vec<usize>,
    next: usize,
}

impl DfsFrame {
    pub(crate) fn new(graph: &TaskGraph, node: usize) -> Self {
        Self {
            node,
            deps: graph.dependency_indices(node),
            next: 0,
        }
    }

    /// Next unexplored dependency of this node, if any.
    pub(crate) fn next_dep(&mut self) -> Option<usize> {
        let dep = self.deps.get(self.next).copied();
        self.next += 1;
        dep
    }

    pub(crate) fn deps(&self) -> &[usize] {
        &self.deps
    }
}
