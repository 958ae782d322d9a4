// src/exec/command.rs

//! Work that runs a shell command as an OS process per task.

use std::process::Stdio;

use anyhow::{anyhow, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::dag::Task;
use crate::exec::work::{Work, WorkFuture};

/// Runs the same shell command for every task.
///
/// The task is described to the process through the environment:
/// `TASKDAG_TASK` holds its name and `TASKDAG_DURATION` its duration in
/// seconds. A non-zero exit status fails the task.
#[derive(Debug, Clone)]
pub struct CommandWork {
    cmd: String,
}

impl CommandWork {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    async fn run_inner(&self, task: &Task) -> anyhow::Result<()> {
        info!(task = %task.name, cmd = %self.cmd, "starting task process");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.env("TASKDAG_TASK", &task.name)
            .env("TASKDAG_DURATION", task.duration.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for task '{}'", task.name))?;

        // Drain both pipes so the child never blocks on a full buffer.
        let mut forwarders = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            let task_name = task.name.clone();
            forwarders.push(tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    info!(task = %task_name, "stdout: {}", line);
                }
            }));
        }
        if let Some(stderr) = child.stderr.take() {
            let task_name = task.name.clone();
            forwarders.push(tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(task = %task_name, "stderr: {}", line);
                }
            }));
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for process of task '{}'", task.name))?;

        for forwarder in forwarders {
            let _ = forwarder.await;
        }

        let code = status.code().unwrap_or(-1);
        info!(
            task = %task.name,
            exit_code = code,
            success = status.success(),
            "task process exited"
        );

        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("process for task '{}' exited with code {code}", task.name))
        }
    }
}

impl Work for CommandWork {
    fn run<'a>(&'a self, task: &'a Task) -> WorkFuture<'a> {
        Box::pin(self.run_inner(task))
    }
}
