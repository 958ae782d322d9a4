// src/exec/timeline.rs

//! Write-once record of when each task ran.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::warn;

use crate::dag::TaskName;

/// Start and end of one task, as offsets from the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub start: Duration,
    pub end: Duration,
}

impl TimelineEntry {
    pub fn start_secs(&self) -> f64 {
        self.start.as_secs_f64()
    }

    pub fn end_secs(&self) -> f64 {
        self.end.as_secs_f64()
    }

    pub fn elapsed(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Shared timeline that workers insert into concurrently.
///
/// Each key can be written once; a second write for the same task is
/// rejected and logged.
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Mutex<BTreeMap<TaskName, TimelineEntry>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the entry for `task`. Returns `false` if one already existed.
    pub fn record(&self, task: &str, entry: TimelineEntry) -> bool {
        let mut guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());

        if guard.contains_key(task) {
            warn!(task = %task, "timeline entry already recorded; keeping the first one");
            return false;
        }

        guard.insert(task.to_string(), entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the entries recorded so far.
    pub fn snapshot(&self) -> BTreeMap<TaskName, TimelineEntry> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}
