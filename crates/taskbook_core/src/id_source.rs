//! Task identifier sources.
//!
//! # Invariants
//! - A single source never yields the same id twice.
//! - Collisions across sources are not detected by core.

use crate::model::task::TaskId;
use std::cell::Cell;
use uuid::Uuid;

/// Supplies unique task identifiers.
pub trait IdSource {
    fn next_id(&self) -> TaskId;
}

/// Random UUID v4 identifiers in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&self) -> TaskId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-1`, `<prefix>-2`, ... identifiers.
#[derive(Debug)]
pub struct SequentialIdSource {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&self) -> TaskId {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}-{value}", self.prefix)
    }
}
