use super::OsrdConf;

/// Manages undo/redo stacks of configuration records with a configurable maximum depth
#[derive(Debug, Clone)]
pub struct ConfHistory {
    undo_stack: Vec<OsrdConf>,
    redo_stack: Vec<OsrdConf>,
    max_levels: usize,
}

impl ConfHistory {
    /// Create a new `ConfHistory` with the specified maximum undo levels
    #[must_use]
    pub fn new(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Push a new snapshot onto the undo stack
    /// This clears the redo stack and enforces the maximum depth limit
    pub fn push_snapshot(&mut self, snapshot: OsrdConf) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);

        if self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
    }

    /// Perform an undo operation, returning the previous record if available
    /// The current record should be provided to push onto the redo stack
    pub fn undo(&mut self, current: OsrdConf) -> Option<OsrdConf> {
        // The last snapshot is the current state since snapshots are recorded after changes
        if self.undo_stack.len() < 2 {
            return None;
        }
        self.undo_stack.pop();
        let previous = self.undo_stack.last().cloned()?;

        self.redo_stack.push(current);
        if self.redo_stack.len() > self.max_levels {
            self.redo_stack.remove(0);
        }

        Some(previous)
    }

    /// Perform a redo operation, returning the next record if available
    pub fn redo(&mut self) -> Option<OsrdConf> {
        let snapshot = self.redo_stack.pop()?;

        self.undo_stack.push(snapshot.clone());
        if self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        Some(snapshot)
    }

    /// Check if undo is available
    /// Need at least 2 items: current state + previous state to restore
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for ConfHistory {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_UNDO_LEVELS)
    }
}
