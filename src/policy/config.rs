use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{DEFAULT_OUTPUT_DIR, ENV_OUTPUT_PATH};
use crate::types::errors::{Error, ErrorKind, Result};

/// Settings govern where rollback documents land and how facts are stamped.
///
/// Sources, lowest precedence first: built-in defaults, the `[rollbook]`
/// table of a TOML file, then the `ROLLBOOK_OUTPUT_PATH` environment variable.
///
/// # Example
/// ```rust
/// use rollbook::policy::Settings;
///
/// let s = Settings::from_toml_str("[rollbook]\noutput_path = \"/var/tmp\"\n").unwrap();
/// assert_eq!(s.output_dir, std::path::PathBuf::from("/var/tmp"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    /// Zero timestamps in facts so repeated runs compare equal.
    pub deterministic_facts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR), deterministic_facts: false }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    rollbook: Section,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Section {
    output_path: Option<PathBuf>,
    deterministic_facts: Option<bool>,
}

impl Settings {
    /// Parse the `[rollbook]` table of a TOML document. Missing keys keep defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;
        let mut s = Self::default();
        if let Some(p) = file.rollbook.output_path {
            s.output_dir = p;
        }
        if let Some(d) = file.rollbook.deterministic_facts {
            s.deterministic_facts = d;
        }
        Ok(s)
    }

    /// Load from an optional settings file, then apply environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let base = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::new(
                        ErrorKind::Config,
                        format!("failed to read settings file {}: {e}", path.display()),
                    )
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// Apply `ROLLBOOK_OUTPUT_PATH` when set to a non-empty value.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var(ENV_OUTPUT_PATH) {
            if !v.is_empty() {
                self.output_dir = PathBuf::from(v);
            }
        }
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_deterministic_facts(mut self, on: bool) -> Self {
        self.deterministic_facts = on;
        self
    }

    /// The output location must be an existing directory.
    pub fn output_dir_usable(&self) -> bool {
        self.output_dir.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_current_directory() {
        let s = Settings::default();
        assert_eq!(s.output_dir, PathBuf::from("."));
        assert!(!s.deterministic_facts);
    }

    #[test]
    fn toml_overrides_defaults() {
        let s = Settings::from_toml_str(
            "[rollbook]\noutput_path = \"/srv/undo\"\ndeterministic_facts = true\n",
        )
        .unwrap();
        assert_eq!(s.output_dir, PathBuf::from("/srv/undo"));
        assert!(s.deterministic_facts);
    }

    #[test]
    fn empty_document_keeps_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let err = Settings::from_toml_str("[rollbook]\nouptut_path = \"x\"\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/rollbook.toml"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }
}
