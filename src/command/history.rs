/// Linear undo/redo ledger.
///
/// `done` holds the active entries oldest first; `undone` holds the entries
/// that were undone, most recent last. Pushing a new entry discards `undone`.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Active entries, in the order they were pushed
    done: Vec<T>,
    /// Entries that can be redone
    undone: Vec<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    /// Creates an empty history
    pub fn new() -> Self {
        Self {
            done: Vec::new(),
            undone: Vec::new(),
        }
    }

    /// Appends an entry and forgets everything that was undone
    pub fn push(&mut self, entry: T) {
        self.done.push(entry);
        self.undone.clear();
    }

    /// Moves the newest active entry onto the redo stack.
    ///
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let entry = self.done.pop()?;
        self.undone.push(entry);
        self.undone.last()
    }

    /// Moves the most recently undone entry back into the active list.
    ///
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let entry = self.undone.pop()?;
        self.done.push(entry);
        self.done.last()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    /// The active entries, oldest first
    pub fn items(&self) -> &[T] {
        &self.done
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Number of entries waiting on the redo stack
    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }
}
