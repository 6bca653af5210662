//! Bounded undo/redo log of shape-collection snapshots.

use crate::shapes::Shape;
use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of the shape collection, in z-order.
pub type Snapshot = Vec<Shape>;

/// Linear history: past snapshots to undo into, future snapshots to redo into.
///
/// Only the shape collection is recorded; view state, tool and selection are
/// never part of a snapshot.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that keeps at most `capacity` undo states (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the state as it was before a change.
    ///
    /// Clears the redo stack and evicts the oldest entry when full.
    pub fn record(&mut self, before: Snapshot) {
        self.undo_stack.push_back(before);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Step back. `current` is kept for redo; returns the state to restore.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward. `current` is kept for undo; returns the state to restore.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of states available to undo.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
