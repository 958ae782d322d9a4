// src/report.rs

//! Human-readable output for `--validate` and `--run`.

use std::fmt::Write;

use crate::dag::CriticalPath;
use crate::exec::{ExecutionResult, TaskFailure};

/// Expected runtime plus the chain that determines it.
pub fn render_expected(cp: &CriticalPath) -> String {
    let mut out = format!("Expected parallel runtime: {:.6} seconds\n", cp.expected_runtime);
    if !cp.path.is_empty() {
        let _ = writeln!(out, "Critical path: {}", cp.path.join(" -> "));
    }
    out
}

/// Timeline (ordered by start time), failures, and the runtime comparison.
pub fn render_result(result: &ExecutionResult) -> String {
    let mut out = String::new();

    let mut entries: Vec<_> = result.timeline.iter().collect();
    entries.sort_by(|(a_name, a), (b_name, b)| {
        a.start.cmp(&b.start).then_with(|| a_name.cmp(b_name))
    });
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    out.push_str("Timeline (seconds since start):\n");
    for (name, entry) in entries {
        let _ = writeln!(
            out,
            "  {name:<width$}  {:>12.6} -> {:>12.6}",
            entry.start_secs(),
            entry.end_secs()
        );
    }

    if !result.failures.is_empty() {
        out.push_str("Failures:\n");
        for (name, failure) in &result.failures {
            let _ = match failure {
                TaskFailure::Failed(reason) => writeln!(out, "  {name}: failed: {reason}"),
                TaskFailure::Skipped { dependency } => {
                    writeln!(out, "  {name}: skipped, dependency '{dependency}' did not complete")
                }
            };
        }
    }

    let _ = writeln!(out, "Expected parallel runtime: {:.6} seconds", result.expected_runtime);
    let _ = writeln!(out, "Actual parallel runtime: {:.6} seconds", result.actual_runtime);
    let _ = writeln!(
        out,
        "Difference between actual and expected runtime: {:.6} seconds",
        result.runtime_difference()
    );
    out
}
