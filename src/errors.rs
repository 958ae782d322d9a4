// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("Malformed record ({record}): {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("Invalid dependency '{dependency}' in task '{task}'")]
    InvalidDependency { task: String, dependency: String },

    #[error("Cycle detected in task dependencies: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("{failed} task(s) failed and {skipped} were skipped during execution")]
    ExecutionFailed { failed: usize, skipped: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskdagError {
    pub(crate) fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        TaskdagError::MalformedRecord {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskdagError>;
