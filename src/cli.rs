// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

/// Command-line arguments for `taskdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskdag",
    version,
    about = "Validate a task dependency graph and run its tasks in parallel.",
    long_about = None
)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .multiple(true)
        .args(["validate", "run"])
))]
pub struct CliArgs {
    /// Task file: `name, duration, [deps]` lines, or TOML when it ends in `.toml`.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Validate the graph and print the expected runtime and critical path.
    #[arg(long)]
    pub validate: bool,

    /// Run all tasks in parallel and compare actual vs. expected runtime.
    #[arg(long)]
    pub run: bool,

    /// What each task does when it runs.
    #[arg(long, value_enum, value_name = "MODE", default_value_t = WorkMode::Sleep)]
    pub work: WorkMode,

    /// Multiplier applied to task durations in `sleep` mode.
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    pub time_scale: f64,

    /// Seconds every task sleeps in `fixed` mode.
    #[arg(long, value_name = "SECS", default_value_t = 10.0)]
    pub fixed_secs: f64,

    /// Shell command run for every task in `command` mode.
    ///
    /// The task name and duration are exported as `TASKDAG_TASK` and
    /// `TASKDAG_DURATION`.
    #[arg(long, value_name = "CMD", required_if_eq("work", "command"))]
    pub cmd: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Work performed by each task during `--run`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum WorkMode {
    /// Sleep for the task's duration (times `--time-scale`).
    Sleep,
    /// Sleep `--fixed-secs` for every task.
    Fixed,
    /// Run `--cmd` in a shell.
    Command,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
