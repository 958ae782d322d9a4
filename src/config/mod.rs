// src/config/mod.rs

//! Task file loading for taskdag.
//!
//! Responsibilities:
//! - Define the decoded record and the TOML data model (`model.rs`).
//! - Decode task files from disk in either supported format (`loader.rs`).
//!
//! Structural checks (unknown dependencies, cycles) live in
//! [`crate::dag::validate`], not here.

pub mod loader;
pub mod model;

pub use loader::{load_records, parse_line, parse_tasks, parse_toml};
pub use model::{TaskConfig, TaskRecord, TasksFile};
