use crate::document_model::Document;
use crate::search::{SearchError, SearchReplace};
use regex::Regex;
use std::fmt;

/// A reversible edit against a [`Document`].
///
/// Every command captures the document content when it is constructed.
/// `undo` restores that snapshot wholesale, so it also discards anything else
/// that happened to the document after construction.
pub trait EditCommand: fmt::Debug {
    fn execute(&self, document: &mut Document);

    fn undo(&self, document: &mut Document);

    /// Short label for logs and history listings
    fn describe(&self) -> String;
}

/// Document content captured before a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    previous_content: String,
}

impl Snapshot {
    pub fn capture(document: &Document) -> Self {
        Self {
            previous_content: document.read().to_string(),
        }
    }

    pub fn restore(&self, document: &mut Document) {
        document.replace(&self.previous_content);
    }
}

#[derive(Debug, Clone)]
pub struct AppendText {
    text: String,
    snapshot: Snapshot,
}

impl AppendText {
    pub fn new(document: &Document, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            snapshot: Snapshot::capture(document),
        }
    }
}

impl EditCommand for AppendText {
    fn execute(&self, document: &mut Document) {
        document.append(&self.text);
    }

    fn undo(&self, document: &mut Document) {
        self.snapshot.restore(document);
    }

    fn describe(&self) -> String {
        format!("append {:?}", self.text)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveTrailing {
    count: usize,
    snapshot: Snapshot,
}

impl RemoveTrailing {
    pub fn new(document: &Document, count: usize) -> Self {
        Self {
            count,
            snapshot: Snapshot::capture(document),
        }
    }
}

impl EditCommand for RemoveTrailing {
    fn execute(&self, document: &mut Document) {
        document.remove(self.count);
    }

    fn undo(&self, document: &mut Document) {
        self.snapshot.restore(document);
    }

    fn describe(&self) -> String {
        format!("remove {}", self.count)
    }
}

/// Replace the characters in `start..end` with new text. Out of range bounds
/// are clamped to the buffer.
#[derive(Debug, Clone)]
pub struct ReplaceRange {
    start: usize,
    end: usize,
    text: String,
    snapshot: Snapshot,
}

impl ReplaceRange {
    pub fn new(document: &Document, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end: end.max(start),
            text: text.into(),
            snapshot: Snapshot::capture(document),
        }
    }
}

impl EditCommand for ReplaceRange {
    fn execute(&self, document: &mut Document) {
        // Character bounds to byte offsets, clamped to the buffer end
        let start = document.byte_offset(self.start);
        let end = document.byte_offset(self.end);

        // Rebuild as prefix + new text + suffix
        let mut updated = String::with_capacity(document.read().len() + self.text.len());
        updated.push_str(&document.read()[..start]);
        updated.push_str(&self.text);
        updated.push_str(&document.read()[end..]);
        document.replace(&updated);
    }

    fn undo(&self, document: &mut Document) {
        self.snapshot.restore(document);
    }

    fn describe(&self) -> String {
        format!("replace {}..{} with {:?}", self.start, self.end, self.text)
    }
}

/// Regex substitution over the whole buffer, like `:%s/pat/rep/`.
#[derive(Debug, Clone)]
pub struct Substitute {
    pattern: String,
    regex: Regex,
    replacement: String,
    global: bool,
    case_sensitive: bool,
    snapshot: Snapshot,
}

impl Substitute {
    pub fn new(
        document: &Document,
        pattern: &str,
        replacement: impl Into<String>,
        global: bool,
        case_sensitive: bool,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex: SearchReplace::compile(pattern, case_sensitive)?,
            replacement: replacement.into(),
            global,
            case_sensitive,
            snapshot: Snapshot::capture(document),
        })
    }
}

impl EditCommand for Substitute {
    fn execute(&self, document: &mut Document) {
        let (updated, count) =
            SearchReplace::substitute_text(document.read(), &self.regex, &self.replacement, self.global);
        if count > 0 {
            document.replace(&updated);
        }
    }

    fn undo(&self, document: &mut Document) {
        self.snapshot.restore(document);
    }

    fn describe(&self) -> String {
        // Same flag letters the script syntax accepts
        let global = if self.global { "g" } else { "" };
        let case = if self.case_sensitive { "I" } else { "i" };
        format!(
            "s/{}/{}/{global}{case}",
            self.pattern.replace('/', r"\/"),
            self.replacement.replace('/', r"\/")
        )
    }
}
