//! Error types for corpus construction and labeling.

use thiserror::Error;

use crate::types::RecordId;

/// Result type alias for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Input errors raised while building a corpus snapshot.
///
/// All of these are fail-fast: a corpus is never built from a partially
/// valid input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CorpusError {
    /// The corpus has no records.
    #[error("empty corpus: {0}")]
    Empty(String),

    /// A complexity label outside the L/M/H alphabet.
    #[error("unknown complexity class: {0:?}")]
    UnknownComplexity(String),

    /// A continuous outcome that is not a finite non-negative number.
    #[error("invalid outcome for record {record}: {value}")]
    InvalidOutcome { record: RecordId, value: f64 },

    /// The same identifier appears twice.
    #[error("duplicate record id: {0}")]
    DuplicateRecord(RecordId),

    /// A training identifier that does not exist in the dataset.
    #[error("training id {0} not present in the analytical dataset")]
    UnknownTrainingId(RecordId),

    /// A date that could not be parsed.
    #[error("invalid date {value:?} in column {column} for record {record}")]
    InvalidDate {
        record: RecordId,
        column: &'static str,
        value: String,
    },

    /// A feature-table row whose width differs from the header.
    #[error("record {record} has {found} feature values, expected {expected}")]
    RowWidth {
        record: RecordId,
        expected: usize,
        found: usize,
    },
}
