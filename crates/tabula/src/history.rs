//! Undo/redo history over [`Command`]s

use std::collections::VecDeque;

use crate::command::Command;
use crate::error::Result;
use log::debug;
use tabula_core::Workbook;

/// Default bound on the number of undoable steps
pub const MAX_HISTORY: usize = 200;

/// Undo and redo stacks of executed commands.
///
/// Executing a new command clears the redo stack. Once the undo stack grows
/// past its bound the oldest entry is dropped and can no longer be undone.
pub struct History {
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_entries: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// History keeping at most `max_entries` undoable steps (at least one)
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Apply a command and record it.
    ///
    /// A command that fails to apply is not recorded and the redo stack is
    /// left alone.
    pub fn execute(&mut self, mut command: Box<dyn Command>, workbook: &mut Workbook) -> Result<()> {
        command.apply(workbook)?;
        debug!("execute: {}", command.description());

        self.undo_stack.push_back(command);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
        Ok(())
    }

    /// Revert the most recent command. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, workbook: &mut Workbook) -> Result<bool> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(e) = command.revert(workbook) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        debug!("undo: {}", command.description());

        self.redo_stack.push(command);
        Ok(true)
    }

    /// Re-apply the most recently undone command. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, workbook: &mut Workbook) -> Result<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };

        if let Err(e) = command.apply(workbook) {
            self.redo_stack.push(command);
            return Err(e);
        }
        debug!("redo: {}", command.description());

        self.undo_stack.push_back(command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command `undo` would revert
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|c| c.description())
    }

    /// Description of the command `redo` would re-apply
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Number of undoable steps
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty() && self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SetCell;
    use tabula_core::{CellAddress, CellData};

    fn set(row: u32, raw: &str) -> Box<dyn Command> {
        Box::new(SetCell::new(
            0,
            CellAddress::new(row, 1),
            Some(CellData::new(raw)),
        ))
    }

    #[test]
    fn test_undo_redo() {
        let mut wb = Workbook::new();
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(!history.undo(&mut wb).unwrap());

        history.execute(set(1, "a"), &mut wb).unwrap();
        assert_eq!(history.undo_description().as_deref(), Some("Edit A1"));

        assert!(history.undo(&mut wb).unwrap());
        assert_eq!(wb.active_sheet().raw_at(1, 1), "");
        assert!(history.can_redo());
        assert_eq!(history.redo_description().as_deref(), Some("Edit A1"));

        assert!(history.redo(&mut wb).unwrap());
        assert_eq!(wb.active_sheet().raw_at(1, 1), "a");
        assert!(!history.redo(&mut wb).unwrap());
    }

    #[test]
    fn test_execute_truncates_redo() {
        let mut wb = Workbook::new();
        let mut history = History::new();

        history.execute(set(1, "a"), &mut wb).unwrap();
        history.undo(&mut wb).unwrap();
        history.execute(set(2, "b"), &mut wb).unwrap();

        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_bounded() {
        let mut wb = Workbook::new();
        let mut history = History::with_capacity(3);

        for row in 1..=4 {
            history.execute(set(row, "x"), &mut wb).unwrap();
        }
        assert_eq!(history.len(), 3);

        while history.undo(&mut wb).unwrap() {}
        // The first edit fell off the stack and stays applied
        assert_eq!(wb.active_sheet().raw_at(1, 1), "x");
        assert_eq!(wb.active_sheet().raw_at(2, 1), "");
    }

    #[test]
    fn test_failed_command_not_recorded() {
        let mut wb = Workbook::new();
        let mut history = History::new();
        let bad = Box::new(SetCell::new(7, CellAddress::new(1, 1), None));

        assert!(history.execute(bad, &mut wb).is_err());
        assert!(history.is_empty());
    }
}
