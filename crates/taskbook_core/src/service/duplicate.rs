//! Duplicate detection over the stored task list.
//!
//! Two tasks are duplicates when their titles are equal after Unicode
//! lowercasing and their due dates are equal. Foreign entries take part
//! when they carry string `title` and `due_date` fields.

use crate::model::draft::TaskDraft;
use crate::model::task::DUE_DATE_FORMAT;
use crate::repo::task_store::StoredEntry;

/// Returns the first stored entry equivalent to `draft`, if any.
pub fn find_duplicate<'a>(
    entries: &'a [StoredEntry],
    draft: &TaskDraft,
) -> Option<&'a StoredEntry> {
    let folded_title = draft.title.to_lowercase();
    let due_date = draft.due_date.format(DUE_DATE_FORMAT).to_string();
    entries.iter().find(|entry| {
        entry.due_date_label().as_deref() == Some(due_date.as_str())
            && entry
                .title()
                .is_some_and(|title| title.to_lowercase() == folded_title)
    })
}

/// Returns whether some stored entry is equivalent to `draft`.
pub fn is_duplicate(entries: &[StoredEntry], draft: &TaskDraft) -> bool {
    find_duplicate(entries, draft).is_some()
}
