// src/exec/coordinator.rs

//! Concurrent execution of a validated task graph.
//!
//! Every task gets its own worker (a Tokio task) and its own completion
//! signal. All workers are spawned up front, with no bound on how many run at
//! once; each one blocks only while waiting for its dependencies.
//!
//! The graph must have passed [`crate::dag::validate`]. A dependency cycle
//! that slips through leaves every worker on the cycle, and everything
//! downstream of it, waiting forever: there is no timeout or cancellation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::dag::{compute_expected_runtime, Task, TaskGraph, TaskName};
use crate::exec::signal::{CompletionSignal, DoneListener};
use crate::exec::timeline::{Timeline, TimelineEntry};
use crate::exec::work::Work;

/// Why a task did not complete successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    /// The work ran and returned an error (or panicked).
    Failed(String),
    /// The work never ran because this dependency did not complete.
    Skipped { dependency: TaskName },
}

/// Outcome of [`execute`].
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Critical-path length in seconds.
    pub expected_runtime: f64,
    /// Wall-clock seconds from launching the first worker to the last one
    /// finishing.
    pub actual_runtime: f64,
    /// Start/end of every task whose work ran.
    pub timeline: BTreeMap<TaskName, TimelineEntry>,
    /// Tasks that failed or were skipped; empty on a clean run.
    pub failures: BTreeMap<TaskName, TaskFailure>,
}

impl ExecutionResult {
    /// `|actual - expected|` in seconds.
    pub fn runtime_difference(&self) -> f64 {
        (self.actual_runtime - self.expected_runtime).abs()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.failures
            .values()
            .filter(|f| matches!(f, TaskFailure::Failed(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.failures.len() - self.failed_count()
    }
}

/// Lifecycle of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    WaitingOnDeps,
    Running,
    Finished,
}

/// How a worker ended.
#[derive(Debug)]
enum WorkerOutcome {
    Succeeded,
    Failed(String),
    Skipped { dependency: TaskName },
}

struct Worker {
    task: Task,
    deps: Vec<(TaskName, DoneListener)>,
    signal: CompletionSignal,
    state: WorkerState,
}

impl Worker {
    fn new(task: Task, deps: Vec<(TaskName, DoneListener)>, signal: CompletionSignal) -> Self {
        Self {
            task,
            deps,
            signal,
            state: WorkerState::Created,
        }
    }

    fn transition(&mut self, next: WorkerState) {
        debug!(task = %self.task.name, from = ?self.state, to = ?next, "worker state change");
        self.state = next;
    }

    async fn run(
        mut self,
        work: Arc<dyn Work>,
        timeline: Arc<Timeline>,
        epoch: Instant,
    ) -> WorkerOutcome {
        self.transition(WorkerState::WaitingOnDeps);

        if !self.deps.is_empty() {
            let waiting_on: Vec<&str> = self.deps.iter().map(|(name, _)| name.as_str()).collect();
            info!(task = %self.task.name, ?waiting_on, "task waiting on dependencies");
        }

        let mut deps = std::mem::take(&mut self.deps);
        for (dep, listener) in deps.iter_mut() {
            if !listener.wait().await {
                warn!(
                    task = %self.task.name,
                    dependency = %dep,
                    "dependency did not complete; skipping task"
                );
                self.transition(WorkerState::Finished);
                return WorkerOutcome::Skipped {
                    dependency: dep.clone(),
                };
            }
        }

        self.transition(WorkerState::Running);
        info!(task = %self.task.name, "task starting");

        // The work runs in its own task so a panic surfaces here as a
        // `JoinError` and the worker can still record and report it.
        let start = epoch.elapsed();
        let task = self.task.clone();
        let result = match tokio::spawn(async move { work.run(&task).await }).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => Err(anyhow!("work panicked: {join_err}")),
            Err(join_err) => Err(anyhow!("work was cancelled: {join_err}")),
        };
        let end = epoch.elapsed();

        timeline.record(&self.task.name, TimelineEntry { start, end });
        self.transition(WorkerState::Finished);

        match result {
            Ok(()) => {
                info!(
                    task = %self.task.name,
                    elapsed_secs = (end - start).as_secs_f64(),
                    "task finished"
                );
                self.signal.fire();
                WorkerOutcome::Succeeded
            }
            Err(err) => {
                error!(task = %self.task.name, error = %err, "task failed");
                // Dropping the signal unfired releases dependents as skipped.
                WorkerOutcome::Failed(format!("{err:#}"))
            }
        }
    }
}

/// Run every task of a validated graph, respecting dependency order.
///
/// `work` is invoked once per task after all of its dependencies finished.
/// A failing task (error or panic) still gets a timeline entry but never
/// fires its completion signal, so every task that depends on it (directly or
/// transitively) is skipped; unrelated tasks keep running.
pub async fn execute(graph: &TaskGraph, work: Arc<dyn Work>) -> ExecutionResult {
    let expected_runtime = compute_expected_runtime(graph);
    info!(expected_runtime, "expected parallel runtime (seconds)");

    let mut signals: HashMap<&str, CompletionSignal> = HashMap::new();
    let mut listeners: HashMap<&str, DoneListener> = HashMap::new();
    for name in graph.task_names() {
        let (signal, listener) = CompletionSignal::new();
        signals.insert(name, signal);
        listeners.insert(name, listener);
    }

    let mut workers = Vec::with_capacity(graph.len());
    for task in graph.tasks() {
        let deps = task
            .dependencies
            .iter()
            .map(|dep| {
                let listener = listeners.get(dep.as_str()).cloned().unwrap_or_else(|| {
                    warn!(task = %task.name, dependency = %dep, "unknown dependency; it will never complete");
                    DoneListener::closed()
                });
                (dep.clone(), listener)
            })
            .collect();

        // Names are unique keys of the graph, so every task has a signal.
        if let Some(signal) = signals.remove(task.name.as_str()) {
            workers.push(Worker::new(task.clone(), deps, signal));
        }
    }
    drop(listeners);

    let timeline = Arc::new(Timeline::new());
    let epoch = Instant::now();

    let handles: Vec<(TaskName, JoinHandle<WorkerOutcome>)> = workers
        .into_iter()
        .map(|worker| {
            let name = worker.task.name.clone();
            let handle = tokio::spawn(worker.run(Arc::clone(&work), Arc::clone(&timeline), epoch));
            (name, handle)
        })
        .collect();

    debug!(workers = handles.len(), "all workers launched");

    let mut failures = BTreeMap::new();
    for (name, handle) in handles {
        match handle.await {
            Ok(WorkerOutcome::Succeeded) => {}
            Ok(WorkerOutcome::Failed(reason)) => {
                failures.insert(name, TaskFailure::Failed(reason));
            }
            Ok(WorkerOutcome::Skipped { dependency }) => {
                failures.insert(name, TaskFailure::Skipped { dependency });
            }
            Err(join_err) => {
                error!(task = %name, error = %join_err, "worker panicked");
                failures.insert(name, TaskFailure::Failed(format!("worker panicked: {join_err}")));
            }
        }
    }

    let actual_runtime = epoch.elapsed().as_secs_f64();

    let result = ExecutionResult {
        expected_runtime,
        actual_runtime,
        timeline: timeline.snapshot(),
        failures,
    };

    info!(actual_runtime, "actual parallel runtime (seconds)");
    info!(
        difference = result.runtime_difference(),
        "difference between actual and expected runtime (seconds)"
    );

    result
}
