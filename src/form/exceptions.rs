//! Exception editor sub-form
//!
//! Holds the working copy of the exception list. Any edit raises the
//! changed flag; only `set_exceptions` or an acknowledged save clears it,
//! so undoing an edit by hand still counts as a change.

use crate::exceptions::ExceptionRecord;
use anyhow::{bail, Result};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ExceptionEditor {
    exceptions: Vec<ExceptionRecord>,
    changed: bool,
}

impl ExceptionEditor {
    /// Replace the list and clear the changed flag
    pub fn set_exceptions(&mut self, exceptions: Vec<ExceptionRecord>) {
        self.exceptions = exceptions;
        self.changed = false;
    }

    pub fn exceptions(&self) -> &[ExceptionRecord] {
        &self.exceptions
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Clear the changed flag once the list has been persisted
    pub fn acknowledge(&mut self) {
        self.changed = false;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.exceptions.len() {
            bail!(
                "No exception at index {} ({} defined)",
                index,
                self.exceptions.len()
            );
        }
        Ok(())
    }

    fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Append a new exception at the end of the list
    pub fn add(&mut self, record: ExceptionRecord) {
        debug!("Adding exception '{}'", record.pattern);
        self.exceptions.push(record);
        self.mark_changed();
    }

    pub fn remove(&mut self, index: usize) -> Result<ExceptionRecord> {
        self.check_index(index)?;
        let record = self.exceptions.remove(index);
        debug!("Removed exception '{}'", record.pattern);
        self.mark_changed();
        Ok(record)
    }

    pub fn replace(&mut self, index: usize, record: ExceptionRecord) -> Result<()> {
        self.check_index(index)?;
        self.exceptions[index] = record;
        self.mark_changed();
        Ok(())
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.check_index(index)?;
        self.exceptions[index].enabled = enabled;
        self.mark_changed();
        Ok(())
    }

    /// Move an exception one position earlier, giving it priority
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index > 0 {
            self.exceptions.swap(index - 1, index);
            self.mark_changed();
        }
        Ok(())
    }

    pub fn move_down(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index + 1 < self.exceptions.len() {
            self.exceptions.swap(index, index + 1);
            self.mark_changed();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ExceptionType;

    fn editor_with(patterns: &[&str]) -> ExceptionEditor {
        let mut editor = ExceptionEditor::default();
        editor.set_exceptions(
            patterns
                .iter()
                .map(|p| ExceptionRecord::new(*p, ExceptionType::WindowClass))
                .collect(),
        );
        editor
    }

    fn patterns(editor: &ExceptionEditor) -> Vec<&str> {
        editor
            .exceptions()
            .iter()
            .map(|e| e.pattern.as_str())
            .collect()
    }

    #[test]
    fn test_set_exceptions_clears_flag() {
        let mut editor = editor_with(&["a"]);
        editor.add(ExceptionRecord::new("b", ExceptionType::WindowTitle));
        assert!(editor.is_changed());
        editor.set_exceptions(Vec::new());
        assert!(!editor.is_changed());
    }

    #[test]
    fn test_moves() {
        let mut editor = editor_with(&["a", "b", "c"]);
        editor.move_up(2).unwrap();
        assert_eq!(patterns(&editor), vec!["a", "c", "b"]);
        editor.move_down(0).unwrap();
        assert_eq!(patterns(&editor), vec!["c", "a", "b"]);
        assert!(editor.is_changed());
    }

    #[test]
    fn test_move_at_edges_is_not_a_change() {
        let mut editor = editor_with(&["a", "b"]);
        editor.move_up(0).unwrap();
        editor.move_down(1).unwrap();
        assert!(!editor.is_changed());
    }

    #[test]
    fn test_out_of_range_edits_fail() {
        let mut editor = editor_with(&["a"]);
        assert!(editor.remove(1).is_err());
        assert!(editor.set_enabled(3, false).is_err());
        assert!(editor.move_up(1).is_err());
        assert!(!editor.is_changed());
    }

    #[test]
    fn test_revert_by_hand_stays_changed() {
        let mut editor = editor_with(&["a"]);
        editor.set_enabled(0, false).unwrap();
        editor.set_enabled(0, true).unwrap();
        assert!(editor.is_changed());
        editor.acknowledge();
        assert!(!editor.is_changed());
    }
}
