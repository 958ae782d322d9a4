// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::cli::{CliArgs, WorkMode};
use crate::config::load_records;
use crate::dag::{critical_path, validate, TaskGraph};
use crate::errors::{Result, TaskdagError};
use crate::exec::{execute, CommandWork, FixedSleepWork, SleepWork, Work};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - task file loading
/// - graph construction and validation (always)
/// - `--validate`: expected runtime and critical path
/// - `--run`: concurrent execution and the runtime comparison
pub async fn run(args: CliArgs) -> Result<()> {
    if !args.file.is_file() {
        return Err(anyhow!("file not found: {}", args.file.display()).into());
    }

    let records = load_records(&args.file)?;
    let graph = TaskGraph::from_records(records);
    validate(&graph)?;
    info!(tasks = graph.len(), file = %args.file.display(), "task graph validated");

    if args.validate {
        let cp = critical_path(&graph);
        print!("{}", report::render_expected(&cp));
    }

    if args.run {
        let work = work_from_args(&args)?;
        let result = execute(&graph, work).await;
        print!("{}", report::render_result(&result));

        if !result.is_success() {
            return Err(TaskdagError::ExecutionFailed {
                failed: result.failed_count(),
                skipped: result.skipped_count(),
            });
        }
    }

    debug!("taskdag finished");
    Ok(())
}

/// Build the work operation selected on the command line.
fn work_from_args(args: &CliArgs) -> Result<Arc<dyn Work>> {
    match args.work {
        WorkMode::Sleep => {
            if !args.time_scale.is_finite() || args.time_scale < 0.0 {
                return Err(anyhow!("--time-scale must be a non-negative number").into());
            }
            Ok(Arc::new(SleepWork::new(args.time_scale)))
        }
        WorkMode::Fixed => {
            let delay = Duration::try_from_secs_f64(args.fixed_secs)
                .map_err(|e| anyhow!("invalid --fixed-secs {}: {e}", args.fixed_secs))?;
            Ok(Arc::new(FixedSleepWork(delay)))
        }
        WorkMode::Command => {
            let cmd = args
                .cmd
                .clone()
                .ok_or_else(|| anyhow!("--cmd is required with --work command"))?;
            Ok(Arc::new(CommandWork::new(cmd)))
        }
    }
}
