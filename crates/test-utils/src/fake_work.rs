use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use taskdag::dag::Task;
use taskdag::exec::{SleepWork, Work, WorkFuture};

/// Work that completes immediately and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantWork;

impl Work for InstantWork {
    fn run<'a>(&'a self, _task: &'a Task) -> WorkFuture<'a> {
        Box::pin(async { Ok(()) })
    }
}

/// A fake work operation that:
/// - records the order in which tasks started
/// - then sleeps for the task's duration (virtual time under a paused clock).
#[derive(Debug, Clone, Default)]
pub struct RecordingWork {
    started: Arc<Mutex<Vec<String>>>,
    sleep: SleepWork,
}

impl RecordingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the start order, usable after the work is moved.
    pub fn started(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.started)
    }
}

impl Work for RecordingWork {
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a> {
        Box::pin(async move {
            {
                let mut guard = self.started.lock().unwrap();
                guard.push(task.name.clone());
            }
            self.sleep.run(task).await
        })
    }
}

/// Sleeps like [`SleepWork`] but returns an error for the named tasks.
#[derive(Debug, Clone, Default)]
pub struct FailingWork {
    failing: HashSet<String>,
    sleep: SleepWork,
}

impl FailingWork {
    pub fn new<'a>(failing: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            failing: failing.into_iter().map(str::to_string).collect(),
            sleep: SleepWork::default(),
        }
    }
}

impl Work for FailingWork {
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a> {
        Box::pin(async move {
            self.sleep.run(task).await?;
            if self.failing.contains(&task.name) {
                return Err(anyhow!("task '{}' failed on purpose", task.name));
            }
            Ok(())
        })
    }
}

/// Panics for every task, to exercise worker panic handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanickingWork;

impl Work for PanickingWork {
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a> {
        Box::pin(explode(task))
    }
}

async fn explode(task: &Task) -> anyhow::Result<()> {
    panic!("work for '{}' panicked", task.name)
}
