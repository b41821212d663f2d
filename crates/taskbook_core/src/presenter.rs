//! Outcome sink consumed by task intake.
//!
//! Core reports structured outcomes here; wording and localization belong
//! to the implementor.

use crate::model::task::Task;
use crate::repo::task_store::LoadIssue;
use crate::service::intake_service::IntakeError;

/// Receives intake outcomes.
pub trait TaskPresenter {
    /// One successful intake.
    fn task_added(&self, task: &Task);
    /// One failed intake.
    fn task_rejected(&self, error: &IntakeError);
    /// The task document could not be used; `location` names it.
    fn database_unreadable(&self, location: &str, issue: &LoadIssue);
}

/// Discards every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl TaskPresenter for NoopPresenter {
    fn task_added(&self, _task: &Task) {}

    fn task_rejected(&self, _error: &IntakeError) {}

    fn database_unreadable(&self, _location: &str, _issue: &LoadIssue) {}
}
