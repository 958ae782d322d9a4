// src/exec/work.rs

//! Pluggable work abstraction.
//!
//! The coordinator never knows what a task actually does; it calls a
//! [`Work`] implementation once per task and awaits it. This makes it easy to
//! swap in instantaneous fakes in tests while production code sleeps, runs a
//! closure on a thread, or spawns an OS process.
//!
//! - [`SleepWork`] sleeps for the task's own duration (optionally scaled).
//! - [`FixedSleepWork`] sleeps a fixed amount of time for every task.
//! - [`BlockingWork`] runs a synchronous closure on tokio's blocking pool.
//! - [`crate::exec::CommandWork`] runs a shell command per task.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::dag::Task;

/// Boxed future returned by [`Work::run`].
pub type WorkFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Trait abstracting the work a task performs once its dependencies are done.
///
/// An `Err` marks the task as failed: its dependents are skipped.
pub trait Work: Send + Sync + 'static {
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a>;
}

/// Sleep for `task.duration * scale` seconds.
#[derive(Debug, Clone, Copy)]
pub struct SleepWork {
    scale: f64,
}

impl SleepWork {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Default for SleepWork {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Work for SleepWork {
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a> {
        Box::pin(async move {
            let secs = task.duration * self.scale;
            let delay = Duration::try_from_secs_f64(secs)
                .map_err(|e| anyhow!("cannot sleep {secs}s for task '{}': {e}", task.name))?;
            tokio::time::sleep(delay).await;
            Ok(())
        })
    }
}

/// Sleep the same fixed time for every task, ignoring its duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedSleepWork(pub Duration);

impl Work for FixedSleepWork {
    fn run<'a>(&'a self, _task: &'a Task) -> WorkFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.0).await;
            Ok(())
        })
    }
}

/// Run a synchronous closure on the blocking thread pool.
pub struct BlockingWork<F> {
    f: Arc<F>,
}

impl<F> BlockingWork<F>
where
    F: Fn(&Task) -> Result<()> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<F> Work for BlockingWork<F>
where
    F: Fn(&Task) -> Result<()> + Send + Sync + 'static,
{
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a> {
        let f = Arc::clone(&self.f);
        let task = task.clone();

        Box::pin(async move {
            let name = task.name.clone();
            tokio::task::spawn_blocking(move || f(&task))
                .await
                .map_err(|e| anyhow!("blocking work for task '{name}' panicked: {e}"))?
        })
    }
}
