//! Task intake use-cases.
//!
//! # Responsibility
//! - Detect duplicates against the stored list.
//! - Orchestrate validation, loading, record construction and saving.

pub mod duplicate;
pub mod intake_service;
