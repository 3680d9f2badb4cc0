//! Core data types for the feature-selection pipeline.
//!
//! A [`Record`] is one premarket submission as seen by feature engineering:
//! an identifier, the free-text device name, the categorical complexity
//! label and the continuous log10 decision time. Records are read once from
//! the analytical dataset and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CorpusError;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of a submission (the K-number, e.g. `K123456`).
///
/// Kept as an opaque string; the pipeline only compares and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Creates a RecordId from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Complexity Class
// ============================================================================

/// Categorical complexity label derived from the decision latency.
///
/// The alphabet is fixed; distributions over it are always laid out in
/// [`ComplexityClass::ALL`] order so vectors from different record subsets
/// line up index by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplexityClass {
    /// Decided within 90 days.
    #[serde(rename = "L")]
    Low,
    /// Decided within 91 to 265 days.
    #[serde(rename = "M")]
    Medium,
    /// Took longer than 265 days.
    #[serde(rename = "H")]
    High,
}

impl ComplexityClass {
    /// Every class, in the canonical vector order.
    pub const ALL: [ComplexityClass; 3] = [Self::Low, Self::Medium, Self::High];

    /// Position of this class inside a categorical distribution vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Single-letter code used in the analytical dataset.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::High => "H",
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ComplexityClass {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" => Ok(Self::Low),
            "M" => Ok(Self::Medium),
            "H" => Ok(Self::High),
            other => Err(CorpusError::UnknownComplexity(other.to_string())),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// One submission in the analytical dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Submission identifier.
    pub id: RecordId,

    /// Free-text device name. May be empty; an empty name simply yields no
    /// tokens.
    pub device_name: String,

    /// Categorical outcome.
    pub complexity: ComplexityClass,

    /// Continuous outcome: log10 of the decision time in days.
    pub decision_time_log10: f64,
}

impl Record {
    /// Creates a record.
    pub fn new(
        id: impl Into<RecordId>,
        device_name: impl Into<String>,
        complexity: ComplexityClass,
        decision_time_log10: f64,
    ) -> Self {
        Self {
            id: id.into(),
            device_name: device_name.into(),
            complexity,
            decision_time_log10,
        }
    }

    /// Checks that the continuous outcome is a finite, non-negative number.
    pub fn validate(&self) -> Result<(), CorpusError> {
        if !self.decision_time_log10.is_finite() || self.decision_time_log10 < 0.0 {
            return Err(CorpusError::InvalidOutcome {
                record: self.id.clone(),
                value: self.decision_time_log10,
            });
        }
        Ok(())
    }
}
