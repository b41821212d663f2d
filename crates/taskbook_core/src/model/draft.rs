//! Raw task input and the Validator that normalizes it into a draft.
//!
//! # Responsibility
//! - Carry raw caller input for one `add` call.
//! - Validate and normalize input into a `TaskDraft`.
//!
//! # Invariants
//! - Checks run in a fixed order: title, due date presence, due date
//!   format, priority. The first failure wins.
//! - `description` and `is_recurring` are never rejected.

use crate::model::task::{Priority, DUE_DATE_FORMAT};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DUE_DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid due date regex"));

/// Raw input for one task intake.
///
/// `None` models an absent field; validation treats it like blank input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: String,
    pub is_recurring: bool,
}

impl AddTaskRequest {
    /// Builds a request where every field is present.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
        priority: impl Into<String>,
        is_recurring: bool,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            due_date: Some(due_date.into()),
            priority: priority.into(),
            is_recurring,
        }
    }
}

/// Validated, normalized task fields without identity or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Trimmed and non-empty.
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub is_recurring: bool,
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    EmptyDueDate,
    /// Carries the raw rejected value.
    BadDueDateFormat(String),
    /// Carries the raw rejected value.
    BadPriority(String),
}

impl TaskValidationError {
    /// Stable machine-readable code used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::EmptyDueDate => "empty_due_date",
            Self::BadDueDateFormat(_) => "bad_due_date_format",
            Self::BadPriority(_) => "bad_priority",
        }
    }
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyDueDate => write!(f, "due date cannot be empty"),
            Self::BadDueDateFormat(value) => {
                write!(f, "due date `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::BadPriority(value) => write!(
                f,
                "priority `{value}` is not one of {}",
                Priority::ALL.map(Priority::label).join("|")
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Validates raw input into a normalized draft.
///
/// # Errors
/// - `EmptyTitle` when title is absent or blank after trimming.
/// - `EmptyDueDate` when due date is absent or blank.
/// - `BadDueDateFormat` when due date is not a calendar-valid `YYYY-MM-DD`.
/// - `BadPriority` when priority is not an exact canonical label.
pub fn validate_request(request: &AddTaskRequest) -> Result<TaskDraft, TaskValidationError> {
    let title = request.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    let raw_due_date = request.due_date.as_deref().unwrap_or_default();
    if raw_due_date.trim().is_empty() {
        return Err(TaskValidationError::EmptyDueDate);
    }
    let due_date = parse_due_date(raw_due_date)
        .ok_or_else(|| TaskValidationError::BadDueDateFormat(raw_due_date.to_string()))?;

    let priority = Priority::from_label(&request.priority)
        .ok_or_else(|| TaskValidationError::BadPriority(request.priority.clone()))?;

    Ok(TaskDraft {
        title: title.to_string(),
        description: request.description.clone().unwrap_or_default(),
        due_date,
        priority,
        is_recurring: request.is_recurring,
    })
}

/// Strict `YYYY-MM-DD` parse of a calendar-valid date in years 0001-9999.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    // Why: chrono's `%Y-%m-%d` also accepts single-digit fields and signed
    // years, so the exact shape is pinned before chrono checks the calendar.
    if !DUE_DATE_SHAPE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
        .ok()
        .filter(|date| date.year() >= 1)
}
