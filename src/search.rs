use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Invalid regex: {0}")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Character offset of the first matched character.
    pub start: usize,
    /// Character offset one past the last matched character.
    pub end: usize,
    pub text: String,
}

pub struct SearchReplace;

impl SearchReplace {
    pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, SearchError> {
        let regex_pattern = if case_sensitive {
            pattern.to_string()
        } else {
            format!("(?i){pattern}")
        };

        Regex::new(&regex_pattern).map_err(|e| SearchError::InvalidPattern(e.to_string()))
    }

    /// Returns the substituted text and how many replacements were made.
    pub fn substitute_text(
        text: &str,
        regex: &Regex,
        replacement: &str,
        global: bool,
    ) -> (String, usize) {
        let original_matches = regex.find_iter(text).count();
        if original_matches == 0 {
            return (text.to_string(), 0);
        }

        if global {
            (regex.replace_all(text, replacement).into_owned(), original_matches)
        } else {
            (regex.replace(text, replacement).into_owned(), 1)
        }
    }

    pub fn find_all(text: &str, regex: &Regex) -> Vec<SearchMatch> {
        regex
            .find_iter(text)
            .map(|mat| {
                let start = text[..mat.start()].chars().count();
                SearchMatch {
                    start,
                    end: start + mat.as_str().chars().count(),
                    text: mat.as_str().to_string(),
                }
            })
            .collect()
    }
}
