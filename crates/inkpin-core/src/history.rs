//! Bounded undo/redo history.
//!
//! Snapshots live in a ring of fixed capacity. The cursor points at the
//! snapshot currently shown on the surface; `None` is the position before the
//! first snapshot, where the surface is empty. Committing while the cursor is
//! not at the newest entry discards everything after it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// A capture of every shape on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Snapshot {
    /// The state before anything was drawn.
    Empty,
    /// Serialized surface contents; immutable once captured.
    Captured(Arc<str>),
}

impl Snapshot {
    pub fn captured(data: impl Into<Arc<str>>) -> Self {
        Snapshot::Captured(data.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Snapshot::Empty)
    }

    /// Serialized data, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Snapshot::Empty => None,
            Snapshot::Captured(data) => Some(data.as_ref()),
        }
    }
}

/// Fixed-capacity circular undo/redo log.
#[derive(Debug, Clone)]
pub struct CircularHistory {
    entries: VecDeque<Snapshot>,
    capacity: usize,
    cursor: Option<usize>,
}

impl Default for CircularHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl CircularHistory {
    /// Create an empty history. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::new(),
            capacity,
            cursor: None,
        }
    }

    /// Record `snapshot` as the newest state.
    pub fn commit(&mut self, snapshot: Snapshot) {
        match self.cursor {
            Some(index) => self.entries.truncate(index + 1),
            None => self.entries.clear(),
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step towards older snapshots. From the oldest one this lands on EMPTY.
    pub fn move_backward(&mut self) {
        self.cursor = match self.cursor {
            Some(0) | None => None,
            Some(index) => Some(index - 1),
        };
    }

    /// Step towards newer snapshots. No-op at the newest one.
    pub fn move_forward(&mut self) {
        self.cursor = match self.cursor {
            None if !self.entries.is_empty() => Some(0),
            Some(index) if index + 1 < self.entries.len() => Some(index + 1),
            other => other,
        };
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Snapshot {
        self.cursor
            .and_then(|index| self.entries.get(index))
            .cloned()
            .unwrap_or(Snapshot::Empty)
    }

    /// All stored snapshots, oldest first.
    pub fn dump_all(&self) -> Vec<Snapshot> {
        self.entries.iter().cloned().collect()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            None => !self.entries.is_empty(),
            Some(index) => index + 1 < self.entries.len(),
        }
    }

    /// Drop every snapshot and return to EMPTY.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
