//! Linear undo/redo history of grid snapshots.
//!
//! The history is a sequence of [`CellGrid`] snapshots plus a pointer to the
//! live one. Recording after an undo truncates everything past the pointer,
//! so redo branches are discarded rather than kept as a tree.
//!
//! # Invariants
//!
//! 1. The sequence is never empty and `pointer < len`.
//! 2. `undo` at 0 and `redo` at `len - 1` are no-ops.
//! 3. When the capacity is exceeded the oldest snapshot is dropped and the
//!    pointer still names the newest one.

use crate::grid::CellGrid;

/// Default maximum number of snapshots retained.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Snapshot sequence with a current-position pointer.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<CellGrid>,
    pointer: usize,
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(CellGrid::empty())
    }
}

impl History {
    /// Start a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: CellGrid) -> Self {
        Self::with_capacity(initial, DEFAULT_MAX_HISTORY)
    }

    /// Start a history retaining at most `max_len` snapshots (minimum 1).
    #[must_use]
    pub fn with_capacity(initial: CellGrid, max_len: usize) -> Self {
        Self {
            snapshots: vec![initial],
            pointer: 0,
            max_len: max_len.max(1),
        }
    }

    /// The snapshot at the pointer.
    #[must_use]
    pub fn current(&self) -> &CellGrid {
        &self.snapshots[self.pointer]
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history holds at least one snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the live snapshot.
    #[must_use]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Snapshot capacity.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.snapshots.len()
    }

    /// Snapshot at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CellGrid> {
        self.snapshots.get(index)
    }

    /// Discard the redo tail, append `grid`, and move the pointer to it.
    pub fn record(&mut self, grid: CellGrid) {
        self.snapshots.truncate(self.pointer + 1);
        self.snapshots.push(grid);
        if self.snapshots.len() > self.max_len {
            let excess = self.snapshots.len() - self.max_len;
            self.snapshots.drain(..excess);
        }
        self.pointer = self.snapshots.len() - 1;
    }

    /// Step back one snapshot.
    ///
    /// Returns the new live snapshot, or `None` when already at the oldest.
    pub fn undo(&mut self) -> Option<&CellGrid> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        Some(self.current())
    }

    /// Step forward one snapshot.
    ///
    /// Returns the new live snapshot, or `None` when already at the newest.
    pub fn redo(&mut self) -> Option<&CellGrid> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        Some(self.current())
    }

    /// Replace everything with a single-entry history holding `grid`.
    pub fn reset(&mut self, grid: CellGrid) {
        self.snapshots.clear();
        self.snapshots.push(grid);
        self.pointer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GridPos;

    fn painted(x: u32) -> CellGrid {
        CellGrid::empty().with_cell(GridPos::new(x, 0), Some("red"))
    }

    #[test]
    fn starts_with_single_entry() {
        let history = History::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.pointer(), 0);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_redo_move_pointer_only() {
        let mut history = History::default();
        history.record(painted(0));
        history.record(painted(1));
        assert_eq!(history.len(), 3);
        assert_eq!(history.pointer(), 2);

        assert_eq!(history.undo(), Some(&painted(0)));
        assert_eq!(history.undo(), Some(&CellGrid::empty()));
        assert_eq!(history.undo(), None);
        assert_eq!(history.pointer(), 0);
        assert_eq!(history.len(), 3);

        assert_eq!(history.redo(), Some(&painted(0)));
        assert_eq!(history.redo(), Some(&painted(1)));
        assert_eq!(history.redo(), None);
        assert_eq!(history.pointer(), 2);
    }

    #[test]
    fn record_after_undo_discards_redo_tail() {
        let mut history = History::default();
        history.record(painted(0));
        history.record(painted(1));
        history.undo();
        history.undo();
        history.record(painted(5));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current(), &painted(5));
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut history = History::with_capacity(CellGrid::empty(), 3);
        for x in 0..5 {
            history.record(painted(x));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.pointer(), 2);
        assert_eq!(history.current(), &painted(4));
        history.undo();
        history.undo();
        assert_eq!(history.current(), &painted(2));
        assert!(history.undo().is_none());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = History::with_capacity(CellGrid::empty(), 0);
        assert_eq!(history.max_len(), 1);
        history.record(painted(0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.pointer(), 0);
        assert_eq!(history.current(), &painted(0));
    }

    #[test]
    fn reset_collapses_to_one() {
        let mut history = History::default();
        history.record(painted(0));
        history.record(painted(1));
        history.undo();
        history.reset(painted(9));
        assert_eq!(history.len(), 1);
        assert_eq!(history.pointer(), 0);
        assert_eq!(history.current(), &painted(9));
    }
}
