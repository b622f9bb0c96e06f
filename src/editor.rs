use crate::document_model::Document;
use crate::edit_commands::{AppendText, EditCommand, RemoveTrailing};
use crate::undo::History;

/// An editing session: one document plus the history of commands run on it.
///
/// Undo at the oldest entry and redo at the newest are silent no-ops.
#[derive(Debug, Default)]
pub struct Editor {
    document: Document,
    history: History,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            history: History::new(),
        }
    }

    pub fn with_undo_levels(max_undo_levels: Option<usize>) -> Self {
        Self {
            document: Document::new(),
            history: History::with_limit(max_undo_levels),
        }
    }

    pub fn execute_command(&mut self, command: Box<dyn EditCommand>) {
        self.history.execute(&mut self.document, command);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }

    pub fn content(&self) -> &str {
        self.document.read()
    }

    /// The document, for constructing commands against its current state.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn append(&mut self, text: &str) {
        let command = AppendText::new(&self.document, text);
        self.execute_command(Box::new(command));
    }

    pub fn remove_trailing(&mut self, count: usize) {
        let command = RemoveTrailing::new(&self.document, count);
        self.execute_command(Box::new(command));
    }

    pub fn position(&self) -> Option<usize> {
        self.history.position()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_labels(&self) -> Vec<(String, bool)> {
        self.history.entries().collect()
    }

    pub fn set_undo_levels(&mut self, max_undo_levels: Option<usize>) {
        self.history.set_limit(max_undo_levels);
    }

    pub fn undo_levels(&self) -> Option<usize> {
        self.history.limit()
    }
}
