//! Error types for the persistence layer.

use std::path::PathBuf;

use featsel_core::{CorpusError, CorpusFingerprint};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed or unserializable JSON artifact.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is absent from the header row.
    #[error("missing column {column} in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A cell could not be interpreted.
    #[error("row {row}, column {column}: {reason}")]
    Malformed {
        row: usize,
        column: String,
        reason: String,
    },

    /// Records that violate corpus invariants.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// A reloaded artifact was produced from a different corpus.
    #[error("artifact {path} was built from corpus {found}, expected {expected}")]
    FingerprintMismatch {
        path: PathBuf,
        expected: CorpusFingerprint,
        found: CorpusFingerprint,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
