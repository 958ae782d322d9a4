// src/config/loader.rs

//! Decoding task files into [`TaskRecord`]s.
//!
//! Two formats are accepted:
//!
//! - TOML (`*.toml`), see [`TasksFile`].
//! - The plain line format, one task per line:
//!
//!   ```text
//!   # name, duration, [dependencies]
//!   A, 2, []
//!   B, 3, [A]
//!   C, 1.5, [A, B]
//!   D, 1, [B C]
//!   ```
//!
//!   Dependencies may be separated by commas, whitespace, or both. Blank
//!   lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::config::model::{check_duration, TaskRecord, TasksFile};
use crate::errors::{Result, TaskdagError};

/// Load task records from a file, choosing the format by extension.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<TaskRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        parse_toml(&contents)
    } else {
        parse_tasks(&contents)
    }
}

/// Parse a TOML task file.
pub fn parse_toml(contents: &str) -> Result<Vec<TaskRecord>> {
    let file: TasksFile = toml::from_str(contents)?;
    file.into_records()
}

/// Parse the line format.
pub fn parse_tasks(contents: &str) -> Result<Vec<TaskRecord>> {
    let parser = LineParser::new()?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| parser.parse(line, i + 1))
        .collect()
}

/// Parse a single `name, duration, [deps]` line. `line_no` is 1-based and
/// only used in error messages.
pub fn parse_line(line: &str, line_no: usize) -> Result<TaskRecord> {
    LineParser::new()?.parse(line, line_no)
}

struct LineParser {
    record: Regex,
    separator: Regex,
}

impl LineParser {
    fn new() -> Result<Self> {
        Ok(Self {
            record: Regex::new(r"^\s*([^,]*),([^,]*),(.*)$").map_err(anyhow::Error::from)?,
            separator: Regex::new(r"[,\s]+").map_err(anyhow::Error::from)?,
        })
    }

    fn parse(&self, line: &str, line_no: usize) -> Result<TaskRecord> {
        let location = format!("line {line_no}");

        let caps = self.record.captures(line).ok_or_else(|| {
            TaskdagError::malformed(
                &location,
                format!("expected `name, duration, [deps]`, got '{}'", line.trim()),
            )
        })?;

        let name = caps[1].trim();
        if name.is_empty() {
            return Err(TaskdagError::malformed(&location, "task name is empty"));
        }

        let raw_duration = caps[2].trim();
        let duration: f64 = raw_duration.parse().map_err(|_| {
            TaskdagError::malformed(&location, format!("invalid duration '{raw_duration}'"))
        })?;
        check_duration(&location, duration)?;

        let deps = caps[3].trim();
        let inner = deps
            .strip_prefix('[')
            .and_then(|d| d.strip_suffix(']'))
            .ok_or_else(|| {
                TaskdagError::malformed(
                    &location,
                    format!("dependency list must be bracketed, got '{deps}'"),
                )
            })?;

        let dependencies = self
            .separator
            .split(inner)
            .map(str::to_string)
            .collect();

        Ok(TaskRecord::new(name, duration, dependencies))
    }
}
