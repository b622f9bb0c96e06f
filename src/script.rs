//! Line-oriented editing scripts.
//!
//! ```text
//! # comments start with # or "
//! append "Hello "
//! a World!
//! remove 1
//! replace 0 5 "Howdy"
//! s/world/there/g
//! find /o/
//! undo 2
//! redo
//! print
//! ```

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static SUBSTITUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^s/((?:[^/\\]|\\.)*)/((?:[^/\\]|\\.)*)/([A-Za-z]*)$")
        .expect("substitute syntax regex is valid")
});

static SLASHED_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/((?:[^/\\]|\\.)*)/([A-Za-z]*)$").expect("find syntax regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOp {
    Append(String),
    Remove(usize),
    Replace {
        start: usize,
        end: usize,
        text: String,
    },
    Substitute {
        pattern: String,
        replacement: String,
        global: bool,
        /// `None` defers to the session's `ignorecase` setting.
        case_sensitive: Option<bool>,
    },
    Find {
        pattern: String,
        case_sensitive: Option<bool>,
    },
    Undo(usize),
    Redo(usize),
    Print,
    Stat,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the script source.
    pub line: usize,
    /// The trimmed source text of the line.
    pub text: String,
    pub op: ScriptOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptErrorKind {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("unterminated quoted text")]
    UnterminatedQuote,
    #[error("unexpected text after argument: `{0}`")]
    TrailingText(String),
    #[error("malformed pattern, expected s/pattern/replacement/flags or /pattern/flags")]
    MalformedPattern,
    #[error("unknown flag `{0}`")]
    UnknownFlag(char),
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
            continue;
        }

        let op = parse_line(line).map_err(|kind| ScriptError {
            line: idx + 1,
            kind,
        })?;
        lines.push(ScriptLine {
            line: idx + 1,
            text: line.to_string(),
            op,
        });
    }

    Ok(lines)
}

pub fn parse_line(line: &str) -> Result<ScriptOp, ScriptErrorKind> {
    if line.starts_with("s/") {
        return parse_substitute(line);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    match word {
        "append" | "a" => Ok(ScriptOp::Append(parse_text(rest, "append")?)),
        "remove" | "x" => {
            let (count, tail) = next_number(rest, "remove")?;
            expect_end(tail)?;
            Ok(ScriptOp::Remove(count))
        }
        "replace" => {
            let (start, tail) = next_number(rest, "replace")?;
            let (end, tail) = next_number(tail, "replace")?;
            let text = parse_text(tail, "replace")?;
            Ok(ScriptOp::Replace { start, end, text })
        }
        "find" => parse_find(rest),
        "undo" | "u" => Ok(ScriptOp::Undo(optional_count(rest)?)),
        "redo" => Ok(ScriptOp::Redo(optional_count(rest)?)),
        "print" | "p" => {
            expect_end(rest)?;
            Ok(ScriptOp::Print)
        }
        "stat" => {
            expect_end(rest)?;
            Ok(ScriptOp::Stat)
        }
        "history" => {
            expect_end(rest)?;
            Ok(ScriptOp::History)
        }
        other => Err(ScriptErrorKind::UnknownCommand(other.to_string())),
    }
}

fn parse_substitute(line: &str) -> Result<ScriptOp, ScriptErrorKind> {
    let caps = SUBSTITUTE_RE
        .captures(line)
        .ok_or(ScriptErrorKind::MalformedPattern)?;

    let mut global = false;
    let mut case_sensitive = None;
    for flag in caps[3].chars() {
        match flag {
            'g' => global = true,
            'I' => case_sensitive = Some(true),
            'i' => case_sensitive = Some(false),
            other => return Err(ScriptErrorKind::UnknownFlag(other)),
        }
    }

    Ok(ScriptOp::Substitute {
        pattern: unescape_delimiter(&caps[1]),
        replacement: unescape_delimiter(&caps[2]),
        global,
        case_sensitive,
    })
}

fn parse_find(rest: &str) -> Result<ScriptOp, ScriptErrorKind> {
    if rest.is_empty() {
        return Err(ScriptErrorKind::MissingArgument("find"));
    }

    if !rest.starts_with('/') {
        return Ok(ScriptOp::Find {
            pattern: rest.to_string(),
            case_sensitive: None,
        });
    }

    let caps = SLASHED_PATTERN_RE
        .captures(rest)
        .ok_or(ScriptErrorKind::MalformedPattern)?;

    let mut case_sensitive = None;
    for flag in caps[2].chars() {
        match flag {
            'I' => case_sensitive = Some(true),
            'i' => case_sensitive = Some(false),
            other => return Err(ScriptErrorKind::UnknownFlag(other)),
        }
    }

    Ok(ScriptOp::Find {
        pattern: unescape_delimiter(&caps[1]),
        case_sensitive,
    })
}

// Only the delimiter escape is ours, the rest belongs to the regex
fn unescape_delimiter(text: &str) -> String {
    text.replace(r"\/", "/")
}

/// Quoted text keeps surrounding whitespace and understands `\n`, `\t`,
/// `\"` and `\\`. Unquoted text is the rest of the line.
fn parse_text(rest: &str, command: &'static str) -> Result<String, ScriptErrorKind> {
    let Some(quoted) = rest.strip_prefix('"') else {
        if rest.is_empty() {
            return Err(ScriptErrorKind::MissingArgument(command));
        }
        return Ok(rest.to_string());
    };

    let mut text = String::new();
    let mut chars = quoted.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            // Closing quote, nothing but whitespace may follow
            '"' => {
                expect_end(quoted[idx + 1..].trim())?;
                return Ok(text);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, other)) => text.push(other),
                // Backslash at the very end, the quote never closed
                None => return Err(ScriptErrorKind::UnterminatedQuote),
            },
            other => text.push(other),
        }
    }

    Err(ScriptErrorKind::UnterminatedQuote)
}

fn next_number<'a>(
    rest: &'a str,
    command: &'static str,
) -> Result<(usize, &'a str), ScriptErrorKind> {
    if rest.is_empty() {
        return Err(ScriptErrorKind::MissingArgument(command));
    }

    let (token, tail) = match rest.split_once(char::is_whitespace) {
        Some((token, tail)) => (token, tail.trim_start()),
        None => (rest, ""),
    };
    let number = token
        .parse()
        .map_err(|_| ScriptErrorKind::InvalidNumber(token.to_string()))?;
    Ok((number, tail))
}

fn optional_count(rest: &str) -> Result<usize, ScriptErrorKind> {
    if rest.is_empty() {
        return Ok(1);
    }
    let (count, tail) = next_number(rest, "count")?;
    expect_end(tail)?;
    Ok(count)
}

fn expect_end(rest: &str) -> Result<(), ScriptErrorKind> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ScriptErrorKind::TrailingText(rest.to_string()))
    }
}
