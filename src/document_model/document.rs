use unicode_width::UnicodeWidthStr;

/// A single text buffer.
///
/// The buffer is only changed through edit commands, or wholesale through
/// [`Document::replace`] when a command is undone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    content: String,
}

impl Document {
    pub fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Remove the last `count` characters. Asking for more than the buffer
    /// holds leaves it empty.
    pub fn remove(&mut self, count: usize) {
        if count == 0 {
            return;
        }

        let cut = self
            .content
            .char_indices()
            .rev()
            .nth(count - 1)
            .map_or(0, |(byte_idx, _)| byte_idx);
        self.content.truncate(cut);
    }

    pub fn read(&self) -> &str {
        &self.content
    }

    pub fn replace(&mut self, text: &str) {
        self.content.clear();
        self.content.push_str(text);
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    // An empty buffer still has one (empty) line
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Terminal column width of the widest line.
    pub fn display_width(&self) -> usize {
        self.content
            .split('\n')
            .map(|line| line.trim_end_matches('\r').width())
            .max()
            .unwrap_or(0)
    }

    /// Byte offset of the character at `char_idx`, clamped to the end of the buffer.
    pub fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(byte_idx, _)| byte_idx)
    }
}
