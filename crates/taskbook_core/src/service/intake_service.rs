//! Task intake orchestration.
//!
//! # Responsibility
//! - Compose Validator -> load -> duplicate check -> record -> save.
//! - Report every outcome to the configured presenter.
//!
//! # Invariants
//! - Validation failures never touch the store.
//! - Exactly one document replacement per successful `add`; no write on
//!   any failure path.
//! - Callers serialize `add` calls; concurrent writers are unsupported.

use crate::clock::Clock;
use crate::config::LoadPolicy;
use crate::id_source::IdSource;
use crate::model::draft::{validate_request, AddTaskRequest, TaskValidationError};
use crate::model::task::{Task, DUE_DATE_FORMAT};
use crate::presenter::{NoopPresenter, TaskPresenter};
use crate::repo::task_store::{StoredEntry, TaskStore};
use crate::service::duplicate::is_duplicate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type IntakeResult<T> = Result<T, IntakeError>;

/// Failure of one `add` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    Validation(TaskValidationError),
    /// A stored task has the same case-folded title and due date.
    Duplicate { title: String, due_date: String },
    /// The document could not be replaced; carries the underlying cause.
    PersistenceFailed(String),
    /// Strict policy refused to write over an unusable document.
    DatabaseUnreadable(String),
}

impl IntakeError {
    /// Stable machine-readable code used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Duplicate { .. } => "duplicate",
            Self::PersistenceFailed(_) => "persistence_failed",
            Self::DatabaseUnreadable(_) => "database_unreadable",
        }
    }
}

impl Display for IntakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate { title, due_date } => {
                write!(f, "task `{title}` due {due_date} already exists")
            }
            Self::PersistenceFailed(cause) => write!(f, "failed to save tasks: {cause}"),
            Self::DatabaseUnreadable(cause) => {
                write!(f, "refusing to overwrite unreadable task document: {cause}")
            }
        }
    }
}

impl Error for IntakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for IntakeError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Appends validated, de-duplicated tasks to a task store.
pub struct TaskIntake<S, C, I, P = NoopPresenter>
where
    S: TaskStore,
    C: Clock,
    I: IdSource,
    P: TaskPresenter,
{
    store: S,
    clock: C,
    ids: I,
    load_policy: LoadPolicy,
    presenter: P,
}

impl<S: TaskStore, C: Clock, I: IdSource> TaskIntake<S, C, I> {
    /// Creates an intake with lenient loading and no presenter output.
    pub fn new(store: S, clock: C, ids: I) -> Self {
        Self {
            store,
            clock,
            ids,
            load_policy: LoadPolicy::default(),
            presenter: NoopPresenter,
        }
    }
}

impl<S, C, I, P> TaskIntake<S, C, I, P>
where
    S: TaskStore,
    C: Clock,
    I: IdSource,
    P: TaskPresenter,
{
    /// Routes outcomes to `presenter`.
    pub fn with_presenter<Q: TaskPresenter>(self, presenter: Q) -> TaskIntake<S, C, I, Q> {
        TaskIntake {
            store: self.store,
            clock: self.clock,
            ids: self.ids,
            load_policy: self.load_policy,
            presenter,
        }
    }

    pub fn with_load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates `request` and appends it as a new pending task.
    ///
    /// # Contract
    /// - Returns the persisted record, including id and timestamps.
    /// - Reports exactly one `task_added` or `task_rejected` to the presenter.
    ///
    /// # Errors
    /// - `Validation` before any store access.
    /// - `Duplicate` after a load, without writing.
    /// - `DatabaseUnreadable` under `LoadPolicy::Strict`, without writing.
    /// - `PersistenceFailed` when the document cannot be replaced.
    pub fn add(&self, request: &AddTaskRequest) -> IntakeResult<Task> {
        match self.append(request) {
            Ok(task) => {
                info!(
                    "event=task_add module=intake status=ok task_id={} is_recurring={}",
                    task.id, task.is_recurring
                );
                self.presenter.task_added(&task);
                Ok(task)
            }
            Err(err) => {
                warn!(
                    "event=task_add module=intake status=error error_code={}",
                    err.error_code()
                );
                self.presenter.task_rejected(&err);
                Err(err)
            }
        }
    }

    fn append(&self, request: &AddTaskRequest) -> IntakeResult<Task> {
        let draft = validate_request(request)?;

        let loaded = self.store.load();
        if let Some(issue) = &loaded.issue {
            self.presenter
                .database_unreadable(&self.store.location(), issue);
            if self.load_policy == LoadPolicy::Strict && !issue.is_fresh_start() {
                return Err(IntakeError::DatabaseUnreadable(issue.to_string()));
            }
        }
        let mut entries = loaded.entries;

        if is_duplicate(&entries, &draft) {
            return Err(IntakeError::Duplicate {
                due_date: draft.due_date.format(DUE_DATE_FORMAT).to_string(),
                title: draft.title,
            });
        }

        let task = Task::from_draft(draft, self.ids.next_id(), self.clock.now());
        entries.push(StoredEntry::Task(task.clone()));
        self.store
            .save(&entries)
            .map_err(|err| IntakeError::PersistenceFailed(err.to_string()))?;

        Ok(task)
    }
}
