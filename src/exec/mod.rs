// src/exec/mod.rs

//! Execution layer.
//!
//! - [`coordinator`] runs one worker per task and builds the
//!   [`ExecutionResult`].
//! - [`signal`] provides the one-shot completion signals workers wait on.
//! - [`timeline`] is the write-once start/end record shared by workers.
//! - [`work`] defines the pluggable [`Work`] trait and the built-in sleeps.
//! - [`command`] provides [`CommandWork`], which runs a shell command per task.

pub mod command;
pub mod coordinator;
pub mod signal;
pub mod timeline;
pub mod work;

pub use command::CommandWork;
pub use coordinator::{execute, ExecutionResult, TaskFailure, WorkerState};
pub use timeline::{Timeline, TimelineEntry};
pub use work::{BlockingWork, FixedSleepWork, SleepWork, Work, WorkFuture};
