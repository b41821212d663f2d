//! Core domain logic for Taskbook task intake.
//! This crate is the single source of truth for task record invariants.

pub mod clock;
pub mod config;
pub mod id_source;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LoadPolicy, TaskbookConfig};
pub use id_source::{IdSource, SequentialIdSource, UuidIdSource};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::draft::{validate_request, AddTaskRequest, TaskDraft, TaskValidationError};
pub use model::task::{Priority, Task, TaskId, TaskStatus};
pub use presenter::{NoopPresenter, TaskPresenter};
pub use repo::task_store::{
    JsonTaskStore, LoadIssue, LoadOutcome, StoreError, StoredEntry, TaskStore,
};
pub use service::duplicate::{find_duplicate, is_duplicate};
pub use service::intake_service::{IntakeError, IntakeResult, TaskIntake};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
