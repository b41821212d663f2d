//! Task document store contract and JSON file implementation.
//!
//! # Responsibility
//! - Load the full task list from one JSON document.
//! - Replace the full document atomically on save.
//!
//! # Invariants
//! - The document is a JSON array of task objects in insertion order.
//! - Saves go through a temporary sibling plus rename; readers never see a
//!   partially written document.
//! - The temporary sibling is removed on every failed save.
//! - Array elements that do not decode as tasks are kept and written back
//!   verbatim.

use crate::model::task::Task;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default document location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "tasks_database.json";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to persist the task list.
#[derive(Debug)]
pub enum StoreError {
    Serialize(serde_json::Error),
    Io { path: PathBuf, source: io::Error },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode task list: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Why a load fell back to an empty task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The document does not exist yet.
    Missing,
    /// The document exists but holds only whitespace.
    Empty,
    /// The document could not be read.
    Unreadable(String),
    /// The document is not valid JSON, or an element is not a task record.
    Malformed(String),
    /// The document is valid JSON but not an array.
    NotAnArray,
}

impl LoadIssue {
    /// Returns whether this issue only means "nothing stored yet".
    ///
    /// Saving over such a document cannot lose data.
    pub fn is_fresh_start(&self) -> bool {
        matches!(self, Self::Missing | Self::Empty)
    }

    /// Stable machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::Unreadable(_) => "unreadable",
            Self::Malformed(_) => "malformed",
            Self::NotAnArray => "not_an_array",
        }
    }
}

impl Display for LoadIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "document does not exist"),
            Self::Empty => write!(f, "document is empty"),
            Self::Unreadable(cause) => write!(f, "document cannot be read: {cause}"),
            Self::Malformed(cause) => write!(f, "document is not a valid task list: {cause}"),
            Self::NotAnArray => write!(f, "document is not a JSON array"),
        }
    }
}

/// One element of the task document.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Task(Task),
    /// Element written by another tool or an older format.
    Foreign(Box<RawValue>),
}

impl StoredEntry {
    fn decode(raw: Box<RawValue>) -> Self {
        match serde_json::from_str::<Task>(raw.get()) {
            Ok(task) => Self::Task(task),
            Err(_) => Self::Foreign(raw),
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Self::Task(task) => Some(task),
            Self::Foreign(_) => None,
        }
    }

    /// Stored title, when present as a string.
    pub fn title(&self) -> Option<String> {
        match self {
            Self::Task(task) => Some(task.title.clone()),
            Self::Foreign(raw) => foreign_string_field(raw, "title"),
        }
    }

    /// Stored due date in its wire form, when present as a string.
    pub fn due_date_label(&self) -> Option<String> {
        match self {
            Self::Task(task) => Some(task.due_date_label()),
            Self::Foreign(raw) => foreign_string_field(raw, "due_date"),
        }
    }
}

impl PartialEq for StoredEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Task(left), Self::Task(right)) => left == right,
            (Self::Foreign(left), Self::Foreign(right)) => left.get() == right.get(),
            _ => false,
        }
    }
}

impl From<Task> for StoredEntry {
    fn from(value: Task) -> Self {
        Self::Task(value)
    }
}

fn foreign_string_field(raw: &RawValue, name: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw.get()).ok()?;
    value.get(name)?.as_str().map(str::to_string)
}

/// Result of reading the task document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadOutcome {
    /// Stored elements in document order; empty whenever `issue` is set.
    pub entries: Vec<StoredEntry>,
    pub issue: Option<LoadIssue>,
}

impl LoadOutcome {
    fn degraded(issue: LoadIssue) -> Self {
        Self {
            entries: Vec::new(),
            issue: Some(issue),
        }
    }

    /// Elements that decoded as task records, in document order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter().filter_map(StoredEntry::as_task)
    }

    pub fn foreign_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, StoredEntry::Foreign(_)))
            .count()
    }
}

/// Read-all / write-all access to the task document.
pub trait TaskStore {
    /// Reads every stored element. Never fails; see `LoadOutcome::issue`.
    fn load(&self) -> LoadOutcome;
    /// Replaces the stored list with `entries`.
    fn save(&self, entries: &[StoredEntry]) -> StoreResult<()>;
    /// Human-readable location for diagnostics.
    fn location(&self) -> String;
}

/// Task store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }

    fn io_error(&self, path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write_replace(&self, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(parent, err))?;
            }
        }

        // Why: the temporary file must live in the target's directory so the
        // rename stays on one filesystem and replaces the document atomically.
        let temp_path = self.temp_path();
        let result = write_synced(&temp_path, bytes)
            .map_err(|err| self.io_error(&temp_path, err))
            .and_then(|()| {
                fs::rename(&temp_path, &self.path).map_err(|err| self.io_error(&self.path, err))
            });

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

impl TaskStore for JsonTaskStore {
    fn load(&self) -> LoadOutcome {
        let outcome = match fs::read_to_string(&self.path) {
            Ok(text) => decode_document(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                LoadOutcome::degraded(LoadIssue::Missing)
            }
            Err(err) => LoadOutcome::degraded(LoadIssue::Unreadable(err.to_string())),
        };

        match &outcome.issue {
            None => info!(
                "event=store_load module=store status=ok entry_count={} foreign_count={}",
                outcome.entries.len(),
                outcome.foreign_count()
            ),
            Some(issue) if issue.is_fresh_start() => info!(
                "event=store_load module=store status=fresh issue={}",
                issue.code()
            ),
            Some(issue) => warn!(
                "event=store_load module=store status=degraded issue={} detail={}",
                issue.code(),
                issue
            ),
        }
        outcome
    }

    fn save(&self, entries: &[StoredEntry]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = serde_json::to_vec_pretty(entries)
            .map_err(StoreError::from)
            .and_then(|bytes| self.write_replace(&bytes));

        match &result {
            Ok(()) => info!(
                "event=store_save module=store status=ok entry_count={} duration_ms={}",
                entries.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Decodes document text into stored entries, classifying every failure mode.
///
/// Only document-level problems degrade the load; an element that is not a
/// task record becomes `StoredEntry::Foreign`.
pub fn decode_document(text: &str) -> LoadOutcome {
    if text.trim().is_empty() {
        return LoadOutcome::degraded(LoadIssue::Empty);
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => return LoadOutcome::degraded(LoadIssue::Malformed(err.to_string())),
    };
    if !value.is_array() {
        return LoadOutcome::degraded(LoadIssue::NotAnArray);
    }

    match serde_json::from_str::<Vec<Box<RawValue>>>(text) {
        Ok(elements) => LoadOutcome {
            entries: elements.into_iter().map(StoredEntry::decode).collect(),
            issue: None,
        },
        Err(err) => LoadOutcome::degraded(LoadIssue::Malformed(err.to_string())),
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
