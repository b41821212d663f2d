//! Task record model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the task document.
//! - Build records from validated drafts (identity + timestamps).
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused.
//! - `status` starts as `Pending`.
//! - `last_updated_at` equals `created_at` at creation.
//! - Unknown JSON fields survive a load/save round-trip through `extra`.

use crate::model::draft::TaskDraft;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Opaque task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

/// Wire format of `due_date`.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Urgency of a task.
///
/// Persisted by canonical English label; localized labels only exist at the
/// presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// All priorities in ascending urgency.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Canonical label used for validation and persistence.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parses a canonical label. Matching is exact and case-sensitive.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.label() == value)
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created, not yet completed.
    Pending,
    /// Completed.
    Done,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Done => "Done",
        }
    }
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty.
    pub title: String,
    pub description: String,
    /// Serialized as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: TaskStatus,
    /// ISO-8601 local date-time, set once at creation.
    pub created_at: NaiveDateTime,
    /// ISO-8601 local date-time, `>= created_at`.
    pub last_updated_at: NaiveDateTime,
    /// Stored as given; recurrence is not expanded.
    pub is_recurring: bool,
    /// Fields written by other tools, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Builds a new pending record from a validated draft.
    ///
    /// # Invariants
    /// - `created_at == last_updated_at == now`.
    /// - `extra` starts empty.
    pub fn from_draft(draft: TaskDraft, id: impl Into<TaskId>, now: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            status: TaskStatus::Pending,
            created_at: now,
            last_updated_at: now,
            is_recurring: draft.is_recurring,
            extra: Map::new(),
        }
    }

    /// Returns `due_date` in its wire form.
    pub fn due_date_label(&self) -> String {
        self.due_date.format(DUE_DATE_FORMAT).to_string()
    }
}
