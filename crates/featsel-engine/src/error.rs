//! Error types for feature selection.

use featsel_core::{CorpusError, FramingKind};
use std::fmt;
use thiserror::Error;

/// Result type alias for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Pipeline phase an error surfaced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tokenize,
    Reference,
    Sweep,
    Select,
    Union,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tokenize => "tokenize",
            Self::Reference => "reference",
            Self::Sweep => "sweep",
            Self::Select => "select",
            Self::Union => "union",
        })
    }
}

/// Errors raised by the selection engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    /// Invalid corpus input.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// The continuous outcome has zero-width range, so no bins exist.
    #[error("degenerate outcome range: min {min}, max {max}")]
    DegenerateOutcomeRange { min: f64, max: f64 },

    /// No record produced a single token.
    #[error("empty vocabulary: no record produced any token")]
    EmptyVocabulary,

    /// The filter-strength grid is unusable.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// None of the top-K candidates could be scored.
    #[error("no scorable features among the top {k} tokens")]
    EmptyCandidateSet { k: usize },

    /// No swept K keeps the median support above the floor.
    #[error(
        "no feasible operating point: best median support {best_support_pct:.4}% \
         is below the {min_support_pct}% minimum"
    )]
    NoFeasibleOperatingPoint {
        min_support_pct: f64,
        best_support_pct: f64,
    },

    /// An error annotated with the phase it occurred in and, once framings
    /// are being processed, the framing.
    #[error("{phase} phase failed{}: {source}", framing_suffix(.framing))]
    InPhase {
        phase: Phase,
        framing: Option<FramingKind>,
        #[source]
        source: Box<SelectionError>,
    },
}

fn framing_suffix(framing: &Option<FramingKind>) -> String {
    framing
        .map(|f| format!(" for framing {f}"))
        .unwrap_or_default()
}

impl SelectionError {
    /// Wraps this error with phase and framing context.
    pub fn in_phase(self, phase: Phase, framing: FramingKind) -> Self {
        Self::InPhase {
            phase,
            framing: Some(framing),
            source: Box::new(self),
        }
    }

    /// Wraps this error with the phase of a step shared by all framings.
    pub fn during(self, phase: Phase) -> Self {
        Self::InPhase {
            phase,
            framing: None,
            source: Box::new(self),
        }
    }

    /// The phase the error surfaced from, if annotated.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::InPhase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// The innermost error, with phase context stripped.
    pub fn root(&self) -> &SelectionError {
        match self {
            Self::InPhase { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Adds phase context to a result.
pub trait PhaseContext<T> {
    fn in_phase(self, phase: Phase, framing: FramingKind) -> SelectionResult<T>;
    fn during(self, phase: Phase) -> SelectionResult<T>;
}

impl<T> PhaseContext<T> for SelectionResult<T> {
    fn in_phase(self, phase: Phase, framing: FramingKind) -> SelectionResult<T> {
        self.map_err(|e| e.in_phase(phase, framing))
    }

    fn during(self, phase: Phase) -> SelectionResult<T> {
        self.map_err(|e| e.during(phase))
    }
}
