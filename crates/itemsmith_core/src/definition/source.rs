//! Definition file discovery and decoding.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of definition files.
pub const DEFINITION_EXTENSION: &str = "json";

/// Raw text of one definition plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSource {
    pub origin: String,
    pub text: String,
}

impl DefinitionSource {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// Decodes the text as one JSON record.
    pub fn decode(&self) -> Result<Value, SourceError> {
        serde_json::from_str(&self.text).map_err(|err| SourceError::Decode {
            origin: self.origin.clone(),
            message: err.to_string(),
        })
    }
}

/// Discovery and decoding errors.
#[derive(Debug)]
pub enum SourceError {
    NotADirectory(PathBuf),
    Walk { path: PathBuf, message: String },
    Read { path: PathBuf, source: io::Error },
    Decode { origin: String, message: String },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory(path) => {
                write!(f, "definitions path is not a directory: {}", path.display())
            }
            Self::Walk { path, message } => {
                write!(f, "cannot list definitions under {}: {message}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "cannot read definition {}: {source}", path.display())
            }
            Self::Decode { origin, message } => {
                write!(f, "definition `{origin}` is not valid JSON: {message}")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Reads every `*.json` file below `dir`, recursively, in sorted path order.
///
/// Origins are paths relative to `dir` with `/` separators.
pub fn collect_definitions(dir: &Path) -> Result<Vec<DefinitionSource>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::NotADirectory(dir.to_path_buf()));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| SourceError::Walk {
            path: dir.to_path_buf(),
            message: err.to_string(),
        })?;
        let path = entry.path();
        let is_definition = entry.file_type().is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(DEFINITION_EXTENSION);
        if !is_definition {
            continue;
        }

        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        sources.push(DefinitionSource::new(origin_of(dir, path), text));
    }
    Ok(sources)
}

fn origin_of(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
