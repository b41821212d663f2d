use chrono::NaiveDateTime;
use serde_json::json;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use taskbook_core::{
    AddTaskRequest, FixedClock, IntakeError, JsonTaskStore, LoadIssue, LoadOutcome, LoadPolicy,
    SequentialIdSource, StoreError, StoredEntry, Task, TaskIntake, TaskPresenter, TaskStatus,
    TaskStore, TaskValidationError,
};

type JsonIntake = TaskIntake<JsonTaskStore, FixedClock, SequentialIdSource>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Added(String),
    Rejected(&'static str),
    Unreadable(&'static str),
}

#[derive(Clone, Default)]
struct RecordingPresenter {
    events: Rc<RefCell<Vec<Event>>>,
}

impl RecordingPresenter {
    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

impl TaskPresenter for RecordingPresenter {
    fn task_added(&self, task: &Task) {
        self.events.borrow_mut().push(Event::Added(task.id.clone()));
    }

    fn task_rejected(&self, error: &IntakeError) {
        self.events
            .borrow_mut()
            .push(Event::Rejected(error.error_code()));
    }

    fn database_unreadable(&self, _location: &str, issue: &LoadIssue) {
        self.events.borrow_mut().push(Event::Unreadable(issue.code()));
    }
}

fn fixed_clock() -> FixedClock {
    let now: NaiveDateTime = "2025-07-20T10:00:00".parse().unwrap();
    FixedClock(now)
}

fn intake_at(path: &Path) -> JsonIntake {
    TaskIntake::new(
        JsonTaskStore::new(path),
        fixed_clock(),
        SequentialIdSource::new("id"),
    )
}

fn buy_books() -> AddTaskRequest {
    AddTaskRequest::new("Buy books", "SE textbook", "2025-07-20", "High", false)
}

fn document(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

fn db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("tasks_database.json")
}

#[test]
fn first_add_creates_document_with_full_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let intake = intake_at(&path);

    let task = intake.add(&buy_books()).unwrap();

    let expected = json!({
        "id": "id-1",
        "title": "Buy books",
        "description": "SE textbook",
        "due_date": "2025-07-20",
        "priority": "High",
        "status": "Pending",
        "created_at": "2025-07-20T10:00:00",
        "last_updated_at": "2025-07-20T10:00:00",
        "is_recurring": false
    });
    assert_eq!(serde_json::to_value(&task).unwrap(), expected);
    assert_eq!(document(&path), json!([expected]));
}

#[test]
fn identical_add_is_rejected_and_document_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let intake = intake_at(&path);

    intake.add(&buy_books()).unwrap();
    let before = fs::read(&path).unwrap();

    let err = intake.add(&buy_books()).unwrap_err();

    assert_eq!(
        err,
        IntakeError::Duplicate {
            title: "Buy books".to_string(),
            due_date: "2025-07-20".to_string(),
        }
    );
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn duplicate_check_folds_case_and_trims_input() {
    let dir = tempfile::tempdir().unwrap();
    let intake = intake_at(&db_path(&dir));

    intake.add(&buy_books()).unwrap();
    let err = intake
        .add(&AddTaskRequest::new(
            "  BUY BOOKS ",
            "other",
            "2025-07-20",
            "Low",
            true,
        ))
        .unwrap_err();

    assert_eq!(err.error_code(), "duplicate");
}

#[test]
fn same_title_on_another_day_is_appended_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let intake = intake_at(&path);

    intake.add(&buy_books()).unwrap();
    intake
        .add(&AddTaskRequest::new(
            "Buy books",
            "SE textbook",
            "2025-07-21",
            "High",
            false,
        ))
        .unwrap();

    let stored: Vec<Task> = intake.store().load().tasks().cloned().collect();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, "id-1");
    assert_eq!(stored[1].id, "id-2");
}

#[test]
fn canonical_scenarios_run_in_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let presenter = RecordingPresenter::default();
    let intake = intake_at(&path).with_presenter(presenter.clone());

    let first = intake.add(&buy_books()).unwrap();
    assert_eq!(first.id, "id-1");

    assert!(matches!(
        intake.add(&buy_books()),
        Err(IntakeError::Duplicate { .. })
    ));

    let second = intake
        .add(&AddTaskRequest::new(
            "Exercise", "Gym 1h", "2025-07-21", "Medium", true,
        ))
        .unwrap();
    assert_eq!(second.id, "id-2");
    assert!(second.is_recurring);

    let after_valid = fs::read(&path).unwrap();

    assert_eq!(
        intake
            .add(&AddTaskRequest::new("", "No title", "2025-07-22", "Low", false))
            .unwrap_err(),
        IntakeError::Validation(TaskValidationError::EmptyTitle)
    );
    assert_eq!(
        intake
            .add(&AddTaskRequest::new("Cook", "Dinner", "22-07-2025", "High", false))
            .unwrap_err(),
        IntakeError::Validation(TaskValidationError::BadDueDateFormat(
            "22-07-2025".to_string()
        ))
    );
    assert_eq!(
        intake
            .add(&AddTaskRequest::new(
                "Study",
                "Midterm",
                "2025-07-23",
                "Very high",
                false
            ))
            .unwrap_err(),
        IntakeError::Validation(TaskValidationError::BadPriority("Very high".to_string()))
    );
    assert_eq!(fs::read(&path).unwrap(), after_valid);

    let stored: Vec<Task> = intake.store().load().tasks().cloned().collect();
    assert_eq!(stored, vec![first, second]);
    assert!(stored.iter().all(|task| task.status == TaskStatus::Pending));

    assert_eq!(
        presenter.events(),
        vec![
            Event::Unreadable("missing"),
            Event::Added("id-1".to_string()),
            Event::Rejected("duplicate"),
            Event::Added("id-2".to_string()),
            Event::Rejected("empty_title"),
            Event::Rejected("bad_due_date_format"),
            Event::Rejected("bad_priority"),
        ]
    );
}

#[test]
fn validation_failure_does_not_create_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let intake = intake_at(&path).with_presenter(RecordingPresenter::default());

    let err = intake
        .add(&AddTaskRequest::new("   ", "", "2025-07-22", "Low", false))
        .unwrap_err();

    assert_eq!(err, IntakeError::Validation(TaskValidationError::EmptyTitle));
    assert!(!path.exists());
    assert_eq!(
        intake.presenter().events(),
        vec![Event::Rejected("empty_title")]
    );
}

#[test]
fn lenient_policy_starts_fresh_over_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    fs::write(&path, "{ not json").unwrap();
    let presenter = RecordingPresenter::default();
    let intake = intake_at(&path).with_presenter(presenter.clone());

    let task = intake.add(&buy_books()).unwrap();

    assert_eq!(document(&path).as_array().map(Vec::len), Some(1));
    assert_eq!(document(&path)[0]["id"], task.id);
    assert_eq!(
        presenter.events(),
        vec![Event::Unreadable("malformed"), Event::Added("id-1".to_string())]
    );
}

#[test]
fn strict_policy_refuses_to_overwrite_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    fs::write(&path, "{\"tasks\": []}").unwrap();
    let intake = intake_at(&path).with_load_policy(LoadPolicy::Strict);

    let err = intake.add(&buy_books()).unwrap_err();

    assert_eq!(err.error_code(), "database_unreadable");
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"tasks\": []}");
}

#[test]
fn strict_policy_still_accepts_missing_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    let intake = intake_at(&path).with_load_policy(LoadPolicy::Strict);

    intake.add(&buy_books()).unwrap();
    assert!(path.exists());
}

#[test]
fn unknown_fields_in_stored_records_are_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    fs::write(
        &path,
        json!([{
            "id": "legacy-1",
            "title": "Water plants",
            "description": "",
            "due_date": "2025-07-19",
            "priority": "Low",
            "status": "Done",
            "created_at": "2025-07-18T08:00:00",
            "last_updated_at": "2025-07-19T08:00:00",
            "is_recurring": true,
            "color": "green"
        }])
        .to_string(),
    )
    .unwrap();
    let intake = intake_at(&path);

    intake.add(&buy_books()).unwrap();

    let value = document(&path);
    assert_eq!(value[0]["color"], "green");
    assert_eq!(value[0]["status"], "Done");
    assert_eq!(value[1]["id"], "id-1");
}

const KEEP_ME: &str = r#"{"id":"keep-1","title":"Keep me","description":"","due_date":"2025-07-19","priority":"Low","status":"Pending","created_at":"2025-07-18T08:00:00","last_updated_at":"2025-07-18T08:00:00","is_recurring":false}"#;
const LEGACY_RECORD: &str = r#"{"id":"0f8e2c1a","title":"Mua sách","description":"Sách Công nghệ phần mềm.","due_date":"2025-07-20","priority":"Cao","status":"Chưa hoàn thành","created_at":"2025-07-19T21:14:03.512","last_updated_at":"2025-07-19T21:14:03.512"}"#;

#[test]
fn records_in_other_formats_survive_an_add() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    fs::write(&path, format!("[{KEEP_ME},{LEGACY_RECORD}]")).unwrap();
    let intake = intake_at(&path).with_presenter(RecordingPresenter::default());

    let task = intake.add(&buy_books()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(LEGACY_RECORD), "legacy record was rewritten: {text}");
    let value = document(&path);
    let ids: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["keep-1", "0f8e2c1a", task.id.as_str()]);
    assert_eq!(intake.presenter().events(), vec![Event::Added(task.id)]);
}

#[test]
fn records_in_other_formats_take_part_in_duplicate_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    fs::write(&path, format!("[{LEGACY_RECORD}]")).unwrap();
    let before = fs::read(&path).unwrap();
    let intake = intake_at(&path);

    let err = intake
        .add(&AddTaskRequest::new(
            "MUA SÁCH",
            "",
            "2025-07-20",
            "High",
            false,
        ))
        .unwrap_err();

    assert_eq!(err.error_code(), "duplicate");
    assert_eq!(fs::read(&path).unwrap(), before);
}

struct ReadOnlyStore {
    inner: JsonTaskStore,
}

impl TaskStore for ReadOnlyStore {
    fn load(&self) -> LoadOutcome {
        self.inner.load()
    }

    fn save(&self, _entries: &[StoredEntry]) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: self.inner.path().to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn location(&self) -> String {
        self.inner.location()
    }
}

#[test]
fn save_failure_is_reported_as_persistence_failed() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    intake_at(&path).add(&buy_books()).unwrap();
    let before = fs::read(&path).unwrap();

    let presenter = RecordingPresenter::default();
    let intake = TaskIntake::new(
        ReadOnlyStore {
            inner: JsonTaskStore::new(&path),
        },
        fixed_clock(),
        SequentialIdSource::new("ro"),
    )
    .with_presenter(presenter.clone());

    let err = intake
        .add(&AddTaskRequest::new(
            "Exercise", "Gym 1h", "2025-07-21", "Medium", true,
        ))
        .unwrap_err();

    match err {
        IntakeError::PersistenceFailed(cause) => assert!(cause.contains("read-only")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(presenter.events(), vec![Event::Rejected("persistence_failed")]);
}
