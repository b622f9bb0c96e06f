use crate::undo::DEFAULT_UNDO_LEVELS;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RC_FILE_NAME: &str = ".snapeditrc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    /// `None` keeps every command in the history.
    pub undo_levels: Option<usize>,
    pub echo: bool,
    pub ignore_case: bool,
    pub color: bool,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            undo_levels: Some(DEFAULT_UNDO_LEVELS),
            echo: false,
            ignore_case: true,
            color: true,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// First existing `.snapeditrc`, checking the working directory before
    /// `$HOME`.
    pub fn get_rc_path() -> Option<PathBuf> {
        let home = env::var_os("HOME").map(PathBuf::from);
        Self::find_rc_in(Path::new("."), home.as_deref())
    }

    fn find_rc_in(current_dir: &Path, home: Option<&Path>) -> Option<PathBuf> {
        let found = std::iter::once(current_dir)
            .chain(home)
            .map(|dir| dir.join(RC_FILE_NAME))
            .find(|candidate| candidate.is_file());
        tracing::debug!(?found, "rc lookup");
        found
    }

    /// Load the RC file from the default locations. A missing or unreadable
    /// file falls back to defaults.
    pub fn load_config() -> RcConfig {
        let Some(rc_path) = Self::get_rc_path() else {
            return RcConfig::default();
        };

        match Self::load_from_path(&rc_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}, using defaults");
                RcConfig::default()
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<RcConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = RcConfig::default();
        Self::parse_config_content(&content, &mut config);
        tracing::info!(path = %path.display(), "loaded rc file");
        Ok(config)
    }

    /// Parse the content of an RC file
    pub fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        let setting = line.strip_prefix("set ").map_or(line, str::trim);

        if let Some((key, value)) = setting.split_once('=') {
            Self::apply_value(key.trim(), value.trim(), config);
        } else if let Some(key) = setting.strip_prefix("no") {
            Self::apply_flag(key, false, config);
        } else {
            Self::apply_flag(setting, true, config);
        }
    }

    fn apply_flag(key: &str, enabled: bool, config: &mut RcConfig) {
        match key {
            "echo" => config.echo = enabled,
            "ignorecase" | "ic" => config.ignore_case = enabled,
            "color" | "colour" => config.color = enabled,
            _ => tracing::debug!(key, "ignoring unknown rc flag"),
        }
    }

    fn apply_value(key: &str, value: &str, config: &mut RcConfig) {
        match key {
            "undolevels" | "ul" | "undo_levels" => {
                if let Ok(levels) = value.parse::<usize>() {
                    config.undo_levels = (levels > 0).then_some(levels);
                }
            }
            "echo" | "ignorecase" | "ic" | "ignore_case" | "color" | "colour" => {
                let enabled = match value {
                    "true" | "1" | "yes" | "on" => true,
                    "false" | "0" | "no" | "off" => false,
                    _ => return,
                };
                let key = if key == "ignore_case" { "ignorecase" } else { key };
                Self::apply_flag(key, enabled, config);
            }
            _ => tracing::debug!(key, "ignoring unknown rc setting"),
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        format!(
            r#"# snapedit configuration file
# Place this file at ./{RC_FILE_NAME} or ~/{RC_FILE_NAME}

# Number of commands kept for undo (0 keeps everything)
set undolevels={DEFAULT_UNDO_LEVELS}

# Write every script line before running it
set noecho

# Case-insensitive substitute and find unless the I flag is given
set ignorecase

# Styled status output when writing to a terminal
set color
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_vim_style_config() {
        let mut config = RcConfig::default();
        let content = r#"
            set undolevels=50
            set echo
            set noignorecase
            set nocolor
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config.undo_levels, Some(50));
        assert!(config.echo);
        assert!(!config.ignore_case);
        assert!(!config.color);
    }

    #[test]
    fn test_parse_key_value_config() {
        let mut config = RcConfig::default();
        let content = r#"
            undo_levels=0
            echo=yes
            ignore_case=false
            color=off
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config.undo_levels, None);
        assert!(config.echo);
        assert!(!config.ignore_case);
        assert!(!config.color);
    }

    #[test]
    fn test_parse_mixed_config_with_comments() {
        let mut config = RcConfig::default();
        let content = r#"
            # This is a comment
            set echo               # Enable echo
            " This is also a comment

            ul=7                   # Short name
            # set nocolor          # This is commented out
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.echo);
        assert_eq!(config.undo_levels, Some(7));
        assert!(config.color);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let mut config = RcConfig::default();
        let content = r#"
            set undolevels=-3
            undolevels=lots
            echo=maybe
            unknown_setting=value
            set bogus
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config, RcConfig::default());
    }

    #[test]
    fn test_sample_rc_parses_to_defaults() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(&RcLoader::generate_sample_rc(), &mut config);
        assert_eq!(config, RcConfig::default());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "set undolevels=3").unwrap();
        writeln!(file, "set echo").unwrap();

        let config = RcLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.undo_levels, Some(3));
        assert!(config.echo);
    }

    #[test]
    fn test_rc_lookup_prefers_current_dir() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::write(home.path().join(RC_FILE_NAME), "set echo\n").unwrap();

        // Only home has one
        let found = RcLoader::find_rc_in(cwd.path(), Some(home.path()));
        assert_eq!(found, Some(home.path().join(RC_FILE_NAME)));

        fs::write(cwd.path().join(RC_FILE_NAME), "set noecho\n").unwrap();
        let found = RcLoader::find_rc_in(cwd.path(), Some(home.path()));
        assert_eq!(found, Some(cwd.path().join(RC_FILE_NAME)));

        let empty = tempfile::tempdir().unwrap();
        assert_eq!(RcLoader::find_rc_in(empty.path(), None), None);
    }

    #[test]
    fn test_load_from_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.rc");

        let err = RcLoader::load_from_path(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("nope.rc"));
    }
}
