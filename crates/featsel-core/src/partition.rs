//! Time-based train/validation/test partitioning.
//!
//! Records are assigned by decision year. Validation and test windows are
//! inclusive year ranges; a year inside both goes to test. Everything else
//! is training data, and only training data may feed feature statistics.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::labeling::AnalyticalRecord;
use crate::types::RecordId;

/// Dataset partition a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Train,
    Validation,
    Test,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Self::Train, Self::Validation, Self::Test];

    /// Lowercase name, also used in identifier-list file names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive range of decision years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }
}

/// Year windows for the held-out partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionRules {
    pub validation: YearRange,
    pub test: YearRange,
}

impl Default for PartitionRules {
    fn default() -> Self {
        Self {
            validation: YearRange::new(2017, 2017),
            test: YearRange::new(2018, 2019),
        }
    }
}

impl PartitionRules {
    /// Assigns a partition from a decision date.
    pub fn assign(&self, decision_date: NaiveDate) -> Partition {
        let year = decision_date.year();
        if self.test.contains(year) {
            Partition::Test
        } else if self.validation.contains(year) {
            Partition::Validation
        } else {
            Partition::Train
        }
    }

    /// Splits records into identifier lists per partition, preserving
    /// input order. Every partition is present in the result, possibly
    /// empty.
    pub fn split(&self, records: &[AnalyticalRecord]) -> BTreeMap<Partition, Vec<RecordId>> {
        let mut out: BTreeMap<Partition, Vec<RecordId>> =
            Partition::ALL.iter().map(|p| (*p, Vec::new())).collect();

        for record in records {
            out.entry(self.assign(record.decision_date))
                .or_default()
                .push(record.id.clone());
        }
        out
    }
}
