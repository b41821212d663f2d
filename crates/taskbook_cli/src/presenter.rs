//! Localized console presenter.
//!
//! # Responsibility
//! - Render intake outcomes as one console line each.
//! - Map canonical priority/status labels to the active locale.
//!
//! # Invariants
//! - Success lines go to stdout; errors and diagnostics go to stderr.

use clap::ValueEnum;
use taskbook_core::{
    IntakeError, LoadIssue, Priority, Task, TaskPresenter, TaskStatus, TaskValidationError,
};

/// Console message language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Vi,
}

impl Locale {
    pub fn priority_label(self, priority: Priority) -> &'static str {
        match (self, priority) {
            (Self::En, _) => priority.label(),
            (Self::Vi, Priority::Low) => "Thấp",
            (Self::Vi, Priority::Medium) => "Trung bình",
            (Self::Vi, Priority::High) => "Cao",
        }
    }

    pub fn status_label(self, status: TaskStatus) -> &'static str {
        match (self, status) {
            (Self::En, _) => status.label(),
            (Self::Vi, TaskStatus::Pending) => "Chưa hoàn thành",
            (Self::Vi, TaskStatus::Done) => "Đã hoàn thành",
        }
    }

    /// Translates a localized priority label to its canonical label.
    ///
    /// Unknown input is returned unchanged so validation can reject it.
    pub fn canonical_priority(self, input: &str) -> String {
        Priority::ALL
            .into_iter()
            .find(|priority| self.priority_label(*priority) == input)
            .map(|priority| priority.label().to_string())
            .unwrap_or_else(|| input.to_string())
    }

    pub fn added_message(self, task: &Task) -> String {
        match self {
            Self::En => format!(
                "Task added: {} ({}, due {}, {})",
                task.id,
                self.priority_label(task.priority),
                task.due_date_label(),
                self.status_label(task.status)
            ),
            Self::Vi => format!(
                "Đã thêm nhiệm vụ thành công: {} ({}, hạn {}, {})",
                task.id,
                self.priority_label(task.priority),
                task.due_date_label(),
                self.status_label(task.status)
            ),
        }
    }

    pub fn error_message(self, error: &IntakeError) -> String {
        let allowed = Priority::ALL
            .map(|priority| self.priority_label(priority))
            .join(", ");
        match (self, error) {
            (Self::En, IntakeError::Validation(TaskValidationError::EmptyTitle)) => {
                "Error: title cannot be empty.".to_string()
            }
            (Self::En, IntakeError::Validation(TaskValidationError::EmptyDueDate)) => {
                "Error: due date cannot be empty.".to_string()
            }
            (Self::En, IntakeError::Validation(TaskValidationError::BadDueDateFormat(_))) => {
                "Error: invalid due date. Please use the YYYY-MM-DD format.".to_string()
            }
            (Self::En, IntakeError::Validation(TaskValidationError::BadPriority(_))) => {
                format!("Error: invalid priority. Please choose one of: {allowed}.")
            }
            (Self::En, IntakeError::Duplicate { .. }) => {
                "Error: this task already exists.".to_string()
            }
            (Self::En, IntakeError::PersistenceFailed(cause)) => {
                format!("Error while writing the task database: {cause}")
            }
            (Self::En, IntakeError::DatabaseUnreadable(cause)) => {
                format!("Error: the task database was left untouched: {cause}")
            }
            (Self::Vi, IntakeError::Validation(TaskValidationError::EmptyTitle)) => {
                "Lỗi: Tiêu đề không được để trống.".to_string()
            }
            (Self::Vi, IntakeError::Validation(TaskValidationError::EmptyDueDate)) => {
                "Lỗi: Ngày đến hạn không được để trống.".to_string()
            }
            (Self::Vi, IntakeError::Validation(TaskValidationError::BadDueDateFormat(_))) => {
                "Lỗi: Ngày đến hạn không hợp lệ. Vui lòng sử dụng định dạng YYYY-MM-DD."
                    .to_string()
            }
            (Self::Vi, IntakeError::Validation(TaskValidationError::BadPriority(_))) => {
                format!("Lỗi: Mức độ ưu tiên không hợp lệ. Vui lòng chọn từ: {allowed}.")
            }
            (Self::Vi, IntakeError::Duplicate { .. }) => {
                "Lỗi: nhiệm vụ đã tồn tại.".to_string()
            }
            (Self::Vi, IntakeError::PersistenceFailed(cause)) => {
                format!("Lỗi khi ghi vào file database: {cause}")
            }
            (Self::Vi, IntakeError::DatabaseUnreadable(cause)) => {
                format!("Lỗi: file database được giữ nguyên: {cause}")
            }
        }
    }

    pub fn diagnostic_message(self, location: &str, issue: &LoadIssue) -> String {
        match (self, issue.is_fresh_start()) {
            (Self::En, true) => format!("Note: starting a new task database at {location}."),
            (Self::En, false) => {
                format!("Error while reading the task database {location}: {issue}")
            }
            (Self::Vi, true) => format!("Ghi chú: tạo file database mới tại {location}."),
            (Self::Vi, false) => format!("Lỗi khi đọc file database {location}: {issue}"),
        }
    }
}

/// Writes intake outcomes to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter {
    locale: Locale,
}

impl ConsolePresenter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl TaskPresenter for ConsolePresenter {
    fn task_added(&self, task: &Task) {
        println!("{}", self.locale.added_message(task));
    }

    fn task_rejected(&self, error: &IntakeError) {
        eprintln!("{}", self.locale.error_message(error));
    }

    fn database_unreadable(&self, location: &str, issue: &LoadIssue) {
        eprintln!("{}", self.locale.diagnostic_message(location, issue));
    }
}
