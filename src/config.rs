//! Configuration System
//!
//! Layered configuration for the CLI: built-in defaults, a global file, the
//! workspace settings file, and `VCONTROL_*` environment variables, in that
//! order of increasing precedence. Tests included.

use crate::ignore::IgnoreSet;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcontrolConfig {
    /// Commit behavior
    #[serde(default)]
    pub commit: CommitConfig,

    /// Interactive output
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Commit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Names always left out of working-tree scans, on top of the control directory.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_ignore() -> Vec<String> {
    vec![".git".to_string()]
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

impl CommitConfig {
    /// Ignore set for a scan: configured names plus `extra` (from `--ignore`).
    pub fn ignore_set(&self, extra: &[String]) -> IgnoreSet {
        let mut set = IgnoreSet::with_names(&self.ignore);
        set.extend(extra);
        set
    }

    pub fn validate(&self) -> Result<(), String> {
        for name in &self.ignore {
            let trimmed = name.trim_end_matches(['/', '\\']);
            if trimmed.is_empty() {
                return Err("Ignore names cannot be empty".to_string());
            }
            if trimmed.contains(['/', '\\']) {
                return Err(format!(
                    "Ignore name '{}' must be a single file or directory name",
                    name
                ));
            }
        }
        Ok(())
    }
}

/// Interactive settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ask before revert overwrites the working tree
    #[serde(default = "default_true")]
    pub confirm: bool,

    /// Colored change report
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm: true,
            color: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Commit(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Commit(msg) => write!(f, "commit: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl VcontrolConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.commit.validate() {
            errors.push(ValidationError::Commit(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
