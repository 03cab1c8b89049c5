use std::path::PathBuf;

use thiserror::Error;

/// Result type for tagger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading dictionaries or reading records.
///
/// Matching itself never fails: an unresolvable span is simply not tagged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Structural fault in the gazetteer hierarchy. `path` names the
    /// offending node as `province/city/district`.
    #[error("malformed gazetteer entry at {path}: {reason}")]
    Gazetteer { path: String, reason: String },

    #[error("malformed newspaper list at line {line}: {reason}")]
    NewspaperList { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn gazetteer(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Gazetteer {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}
