// src/dag/mod.rs

//! Task graph representation and analysis.
//!
//! - [`graph`] holds the task arena and name index.
//! - [`validate`] checks referential integrity and acyclicity.
//! - [`critical_path`] computes earliest finish times and the expected runtime.

pub mod critical_path;
pub mod graph;
pub mod validate;

pub use critical_path::{compute_expected_runtime, critical_path, CriticalPath};
pub use graph::{Task, TaskGraph, TaskName};
pub use validate::{check_references, find_cycle, validate, VisitState};
