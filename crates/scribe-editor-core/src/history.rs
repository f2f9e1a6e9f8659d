//! Undo/redo management for the native document model.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `History<S>` - bounded snapshot stacks

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
/// In the browser the host's native command history plays this role.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// Bounded undo/redo stacks of whole-document snapshots.
///
/// The owner records the state *before* each edit. Undo hands back the
/// snapshot to restore and expects the current state in exchange, which
/// becomes the redo entry (and the other way round).
#[derive(Debug, Clone)]
pub struct History<S> {
    undo_stack: Vec<S>,
    redo_stack: Vec<S>,
    max_steps: usize,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(100)
    }
}

impl<S> History<S> {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Record the state before an edit.
    pub fn record(&mut self, before: S) {
        // Clear redo stack on new edit
        self.redo_stack.clear();
        self.undo_stack.push(before);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the state to restore, pushing `current` onto the redo stack.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the state to re-apply, pushing `current` onto the undo stack.
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_then_redo_swaps_states() {
        let mut history = History::new(100);
        history.record("a");
        // current state is "ab"
        assert_eq!(history.undo("ab"), Some("a"));
        assert!(history.can_redo());
        assert_eq!(history.redo("a"), Some("ab"));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut history = History::new(100);
        history.record(1);
        assert_eq!(history.undo(2), Some(1));
        assert!(history.can_redo());

        history.record(1);
        assert!(!history.can_redo());
    }

    #[test]
    fn max_steps() {
        let mut history = History::new(3);
        for state in ["", "a", "ab", "abc"] {
            history.record(state);
        }

        // Should only be able to undo 3 times
        assert_eq!(history.undo("abcd"), Some("abc"));
        assert_eq!(history.undo("abc"), Some("ab"));
        assert_eq!(history.undo("ab"), Some("a"));
        assert_eq!(history.undo("a"), None); // "" was evicted
    }

    #[test]
    fn empty_history_does_nothing() {
        let mut history: History<u8> = History::default();
        assert_eq!(history.undo(0), None);
        assert_eq!(history.redo(0), None);
        assert_eq!(history.max_steps(), 100);
    }
}
