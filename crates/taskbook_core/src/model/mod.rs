//! Domain model for task intake.
//!
//! # Responsibility
//! - Define the persisted task record and its enumerated fields.
//! - Define the validated draft and the Validator that produces it.
//!
//! # Invariants
//! - Every record is identified by an opaque `TaskId` that is never reused.
//! - `created_at <= last_updated_at` for every record.

pub mod draft;
pub mod task;
