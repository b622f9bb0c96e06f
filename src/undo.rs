use crate::document_model::Document;
use crate::edit_commands::EditCommand;

pub const DEFAULT_UNDO_LEVELS: usize = 1000;

/// Linear command history with a cursor.
///
/// Commands before the cursor are applied, commands after it can be redone.
/// Pushing a new command drops everything after the cursor.
#[derive(Debug)]
pub struct History {
    commands: Vec<Box<dyn EditCommand>>,
    applied: usize,
    max_undo_levels: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(Some(DEFAULT_UNDO_LEVELS))
    }

    pub fn with_limit(max_undo_levels: Option<usize>) -> Self {
        Self {
            commands: Vec::new(),
            applied: 0,
            max_undo_levels,
        }
    }

    pub fn set_limit(&mut self, max_undo_levels: Option<usize>) {
        self.max_undo_levels = max_undo_levels;
        self.enforce_limit();
    }

    pub fn limit(&self) -> Option<usize> {
        self.max_undo_levels
    }

    /// Run `command` against `document` and record it as the newest entry.
    pub fn execute(&mut self, document: &mut Document, command: Box<dyn EditCommand>) {
        // Anything past the cursor is an abandoned redo branch
        let dropped = self.commands.len() - self.applied;
        if dropped > 0 {
            tracing::debug!(dropped, "discarding redo branch");
        }
        self.commands.truncate(self.applied);

        command.execute(document);
        tracing::debug!(command = %command.describe(), "executed");

        self.commands.push(command);
        self.applied += 1;
        self.enforce_limit();
    }

    pub fn undo(&mut self, document: &mut Document) -> bool {
        if self.applied == 0 {
            tracing::trace!("nothing to undo");
            return false;
        }

        self.applied -= 1;
        let command = &self.commands[self.applied];
        command.undo(document);
        tracing::debug!(command = %command.describe(), "undone");
        true
    }

    pub fn redo(&mut self, document: &mut Document) -> bool {
        if self.applied == self.commands.len() {
            tracing::trace!("nothing to redo");
            return false;
        }

        let command = &self.commands[self.applied];
        self.applied += 1;
        command.execute(document);
        tracing::debug!(command = %command.describe(), "redone");
        true
    }

    /// Index of the newest applied command, `None` when nothing is applied.
    pub fn position(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.commands.len()
    }

    /// Labels of every entry, paired with whether it is currently applied.
    pub fn entries(&self) -> impl Iterator<Item = (String, bool)> + '_ {
        self.commands
            .iter()
            .enumerate()
            .map(|(idx, command)| (command.describe(), idx < self.applied))
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.max_undo_levels else {
            return;
        };

        if self.commands.len() > limit {
            let excess = self.commands.len() - limit;
            self.commands.drain(..excess);

            // Evicted entries were all before the cursor unless the limit
            // was lowered while redo entries existed
            self.applied = self.applied.saturating_sub(excess);
            tracing::debug!(evicted = excess, limit, "undo history trimmed");
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
