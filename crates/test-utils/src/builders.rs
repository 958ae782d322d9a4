#![allow(dead_code)]

use taskdag::config::TaskRecord;
use taskdag::dag::TaskGraph;

/// Builder for `TaskGraph` to simplify test setup.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    records: Vec<TaskRecord>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task with the given duration (seconds) and dependencies.
    pub fn task(mut self, name: &str, duration: f64, deps: &[&str]) -> Self {
        self.records.push(TaskRecord::new(
            name,
            duration,
            deps.iter().map(|d| d.to_string()).collect(),
        ));
        self
    }

    /// Add a task with no dependencies.
    pub fn root(self, name: &str, duration: f64) -> Self {
        self.task(name, duration, &[])
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn build(self) -> TaskGraph {
        TaskGraph::from_records(self.records)
    }
}
