//! Persistence layer for the task document.
//!
//! # Responsibility
//! - Define the read-all / write-all store contract used by intake.
//! - Keep JSON and file-system details inside the persistence boundary.
//!
//! # Invariants
//! - `load` never fails the caller; problems are reported as `LoadIssue`.
//! - `save` replaces the whole document or leaves it untouched.

pub mod task_store;
