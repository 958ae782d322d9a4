// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::{Result, TaskdagError};

/// A decoded input record: everything the core needs to know about a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub name: String,
    /// Seconds of work; non-negative.
    pub duration: f64,
    /// Dependency names in input order. Blank entries are tolerated here and
    /// dropped when the graph is built.
    pub dependencies: Vec<String>,
}

impl TaskRecord {
    pub fn new(name: impl Into<String>, duration: f64, dependencies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            duration,
            dependencies,
        }
    }
}

/// Top-level TOML task file.
///
/// ```toml
/// [task.A]
/// duration = 2.0
///
/// [task.B]
/// duration = 3
/// after = ["A"]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TasksFile {
    /// Keys are the task names.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Seconds of work.
    pub duration: f64,

    /// Dependency list: this task waits for all tasks listed here.
    #[serde(default)]
    pub after: Vec<String>,
}

impl TasksFile {
    /// Convert into records, rejecting blank names and invalid durations.
    ///
    /// Keys are trimmed the same way line-format names are.
    pub fn into_records(self) -> Result<Vec<TaskRecord>> {
        self.task
            .into_iter()
            .map(|(key, cfg)| {
                let record = format!("task.{key}");
                let name = key.trim();
                if name.is_empty() {
                    return Err(TaskdagError::malformed(record, "task name is empty"));
                }
                check_duration(&record, cfg.duration)?;
                Ok(TaskRecord::new(name, cfg.duration, cfg.after))
            })
            .collect()
    }
}

/// Durations must be finite and non-negative.
pub(crate) fn check_duration(record: &str, duration: f64) -> Result<()> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(TaskdagError::malformed(
            record,
            format!("duration must be a non-negative number of seconds (got {duration})"),
        ));
    }
    Ok(())
}
