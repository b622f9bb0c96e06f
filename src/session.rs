use crate::config::RcConfig;
use crate::edit_commands::{AppendText, RemoveTrailing, ReplaceRange, Substitute};
use crate::editor::Editor;
use crate::script::{ScriptError, ScriptLine, ScriptOp, parse_script};
use crate::search::{SearchError, SearchReplace};
use crossterm::style::{Stylize, style};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("line {line}: {source}")]
    Search {
        line: usize,
        #[source]
        source: SearchError,
    },
    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub echo: bool,
    pub color: bool,
    pub ignore_case: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&RcConfig::default())
    }
}

impl From<&RcConfig> for SessionOptions {
    fn from(config: &RcConfig) -> Self {
        Self {
            echo: config.echo,
            color: config.color,
            ignore_case: config.ignore_case,
        }
    }
}

/// Runs script lines against an [`Editor`], writing any output to `out`.
pub struct Session<W: Write> {
    editor: Editor,
    out: W,
    options: SessionOptions,
}

impl<W: Write> Session<W> {
    pub fn new(editor: Editor, out: W, options: SessionOptions) -> Self {
        Self {
            editor,
            out,
            options,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn into_parts(self) -> (Editor, W) {
        (self.editor, self.out)
    }

    /// Parse `source` completely before running any of it.
    pub fn run_source(&mut self, source: &str) -> Result<(), SessionError> {
        let lines = parse_script(source)?;
        self.run(&lines)
    }

    pub fn run(&mut self, lines: &[ScriptLine]) -> Result<(), SessionError> {
        for line in lines {
            self.apply(line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn apply(&mut self, line: &ScriptLine) -> Result<(), SessionError> {
        if self.options.echo {
            let echoed = format!("{:>3}: {}", line.line, line.text);
            self.write_secondary(&echoed)?;
        }

        tracing::trace!(line = line.line, op = ?line.op, "applying");

        match &line.op {
            ScriptOp::Append(text) => {
                let command = AppendText::new(self.editor.document(), text.as_str());
                self.editor.execute_command(Box::new(command));
            }
            ScriptOp::Remove(count) => {
                let command = RemoveTrailing::new(self.editor.document(), *count);
                self.editor.execute_command(Box::new(command));
            }
            ScriptOp::Replace { start, end, text } => {
                let command = ReplaceRange::new(self.editor.document(), *start, *end, text.as_str());
                self.editor.execute_command(Box::new(command));
            }
            ScriptOp::Substitute {
                pattern,
                replacement,
                global,
                case_sensitive,
            } => {
                let case_sensitive = case_sensitive.unwrap_or(!self.options.ignore_case);
                let command = Substitute::new(
                    self.editor.document(),
                    pattern,
                    replacement.as_str(),
                    *global,
                    case_sensitive,
                )
                .map_err(|source| SessionError::Search {
                    line: line.line,
                    source,
                })?;
                self.editor.execute_command(Box::new(command));
            }
            ScriptOp::Find {
                pattern,
                case_sensitive,
            } => {
                let case_sensitive = case_sensitive.unwrap_or(!self.options.ignore_case);
                let regex = SearchReplace::compile(pattern, case_sensitive).map_err(|source| {
                    SessionError::Search {
                        line: line.line,
                        source,
                    }
                })?;
                let matches = SearchReplace::find_all(self.editor.content(), &regex);
                if matches.is_empty() {
                    self.write_secondary("no matches")?;
                }
                for found in matches {
                    writeln!(self.out, "{}..{} {:?}", found.start, found.end, found.text)?;
                }
            }
            ScriptOp::Undo(count) => {
                for _ in 0..*count {
                    if !self.editor.undo() {
                        break;
                    }
                }
            }
            ScriptOp::Redo(count) => {
                for _ in 0..*count {
                    if !self.editor.redo() {
                        break;
                    }
                }
            }
            ScriptOp::Print => {
                writeln!(self.out, "{}", self.editor.content())?;
            }
            ScriptOp::Stat => {
                let document = self.editor.document();
                let applied = self.editor.position().map_or(0, |p| p + 1);
                let stat = format!(
                    "chars={} lines={} width={} history={}/{}",
                    document.char_count(),
                    document.line_count(),
                    document.display_width(),
                    applied,
                    self.editor.history_len()
                );
                self.write_secondary(&stat)?;
            }
            ScriptOp::History => self.write_history()?,
        }

        Ok(())
    }

    fn write_history(&mut self) -> io::Result<()> {
        let position = self.editor.position();
        for (idx, (label, applied)) in self.editor.history_labels().into_iter().enumerate() {
            let marker = if Some(idx) == position { '>' } else { ' ' };
            let entry = format!("{marker}{idx:>3} {label}");
            if applied {
                writeln!(self.out, "{entry}")?;
            } else if self.options.color {
                writeln!(self.out, "{}", entry.dark_grey())?;
            } else {
                writeln!(self.out, "{entry} (undone)")?;
            }
        }
        Ok(())
    }

    fn write_secondary(&mut self, text: &str) -> io::Result<()> {
        if self.options.color {
            writeln!(self.out, "{}", style(text).dark_grey())
        } else {
            writeln!(self.out, "{text}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> SessionOptions {
        SessionOptions {
            echo: false,
            color: false,
            ignore_case: true,
        }
    }

    fn run(source: &str, options: SessionOptions) -> (Editor, String) {
        let mut session = Session::new(Editor::new(), Vec::new(), options);
        session.run_source(source).unwrap();
        let (editor, out) = session.into_parts();
        (editor, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_hello_world_script() {
        let source = r#"
            append "Hello "
            append "World!"
            print
            undo
            print
            undo
            print
            redo
            print
        "#;

        let (_, out) = run(source, plain());
        assert_eq!(out, "Hello World!\nHello \n\nHello \n");
    }

    #[test]
    fn test_over_removal_script() {
        let (editor, out) = run("append abcdef\nremove 6\nremove 3\nprint\n", plain());
        assert_eq!(out, "\n");
        assert_eq!(editor.content(), "");
        assert_eq!(editor.history_len(), 3);
    }

    #[test]
    fn test_undo_count_stops_at_boundary() {
        let (editor, _) = run("a one\na two\nundo 5\nredo 1\n", plain());
        assert_eq!(editor.content(), "one");
        assert_eq!(editor.position(), Some(0));
    }

    #[test]
    fn test_substitute_uses_ignorecase_setting() {
        let (editor, _) = run("a Foo foo\ns/foo/bar/g\n", plain());
        assert_eq!(editor.content(), "bar bar");

        let (editor, _) = run("a Foo foo\ns/foo/bar/gI\n", plain());
        assert_eq!(editor.content(), "Foo bar");

        let strict = SessionOptions {
            ignore_case: false,
            ..plain()
        };
        let (editor, _) = run("a Foo foo\ns/foo/bar/g\n", strict);
        assert_eq!(editor.content(), "Foo bar");
    }

    #[test]
    fn test_invalid_substitute_reports_line() {
        let mut session = Session::new(Editor::new(), Vec::new(), plain());
        let err = session.run_source("a text\n\ns/(/x/\n").unwrap_err();
        match err {
            SessionError::Search { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
        // Lines before the failure still ran
        assert_eq!(session.editor().content(), "text");
    }

    #[test]
    fn test_parse_error_runs_nothing() {
        let mut session = Session::new(Editor::new(), Vec::new(), plain());
        let err = session.run_source("a text\nbogus\n").unwrap_err();
        assert!(matches!(err, SessionError::Script(_)));
        assert_eq!(session.editor().content(), "");
    }

    #[test]
    fn test_find_and_stat_output() {
        let (_, out) = run("a abcabc\nfind /b/\nfind zz\nstat\n", plain());
        assert_eq!(
            out,
            "1..2 \"b\"\n4..5 \"b\"\nno matches\nchars=6 lines=1 width=6 history=1/1\n"
        );
    }

    #[test]
    fn test_history_listing() {
        let (_, out) = run("a x\nremove 1\nundo\nhistory\n", plain());
        assert_eq!(out, ">  0 append \"x\"\n   1 remove 1 (undone)\n");
    }

    #[test]
    fn test_history_shows_substitute_as_written() {
        let (_, out) = run("a foo\ns/foo/bar/g\ns/BAR/baz/I\nhistory\n", plain());
        assert_eq!(
            out,
            "   0 append \"foo\"\n   1 s/foo/bar/gi\n>  2 s/BAR/baz/I\n"
        );
    }

    #[test]
    fn test_echo_writes_source_lines() {
        let options = SessionOptions {
            echo: true,
            ..plain()
        };
        let (_, out) = run("append hi\nprint\n", options);
        assert_eq!(out, "  1: append hi\n  2: print\nhi\n");
    }

    #[test]
    fn test_replace_range_script() {
        let (editor, _) = run("a Hello World\nreplace 0 5 \"Howdy\"\n", plain());
        assert_eq!(editor.content(), "Howdy World");
    }

    #[test]
    fn test_color_output_keeps_text() {
        let options = SessionOptions {
            color: true,
            ..plain()
        };
        let (_, out) = run("stat\nprint\n", options);
        assert!(out.contains("chars=0 lines=1 width=0 history=0/0"));
        assert!(out.ends_with("\n\n"));
    }
}
