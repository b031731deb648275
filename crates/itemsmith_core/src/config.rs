//! Build configuration.
//!
//! # Responsibility
//! - Describe one build run: where definitions live, which pack receives them,
//!   failure policy and logging target.
//!
//! # Invariants
//! - Every field has a default; unknown keys are rejected.

use crate::pipeline::context::SUPPORTED_PACK_FORMAT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Settings for one build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub definitions_dir: PathBuf,
    pub pack_name: String,
    pub pack_format: u32,
    pub strict: bool,
    pub log_level: String,
    /// Absolute directory for rotating log files. `None` logs to stderr.
    pub log_dir: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from("definitions"),
            pack_name: "itemsmith_pack".to_string(),
            pack_format: SUPPORTED_PACK_FORMAT,
            strict: false,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// Loads a [`BuildConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
