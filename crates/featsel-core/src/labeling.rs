//! Labeling rules for turning raw submissions into analytical records.
//!
//! ## Rules
//!
//! - decision time = decision date − receipt date, in days
//! - complexity: `L` if ≤ 90 days, `M` if ≤ 265 days, `H` otherwise
//! - continuous outcome: log10 of the decision time
//!
//! ## Filters
//!
//! Only submissions decided on or after 2007-10-01 (start of MDUFA II), not
//! reviewed by a third party, of type `Traditional` and with a substantially
//! equivalent (`SESE`) decision are retained. Submissions decided in under
//! one day have no non-negative log10 outcome and are dropped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CorpusError, CorpusResult};
use crate::types::{ComplexityClass, Record, RecordId};

/// Upper bound (inclusive) of the low-complexity decision time, in days.
pub const LOW_MAX_DAYS: i64 = 90;

/// Upper bound (inclusive) of the medium-complexity decision time, in days.
pub const MEDIUM_MAX_DAYS: i64 = 265;

/// First decision date retained by the analytical filters.
pub const MDUFA_II_START: NaiveDate = match NaiveDate::from_ymd_opt(2007, 10, 1) {
    Some(date) => date,
    None => panic!("invalid MDUFA II start date"),
};

/// Date formats accepted in raw and analytical files.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// A raw premarket submission, as parsed from the public database dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: RecordId,
    pub device_name: String,
    pub date_received: NaiveDate,
    pub decision_date: NaiveDate,
    /// `Y` when a third party reviewed the submission.
    pub third_party: String,
    /// Submission type, e.g. `Traditional`, `Special`, `Abbreviated`.
    pub submission_type: String,
    /// Decision code, e.g. `SESE`.
    pub decision: String,
    /// Three-letter product classification code.
    pub product_code: String,
    /// Advisory committee the device class is reviewed by.
    pub advisory_committee: String,
}

/// A labeled submission that passed the analytical filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalRecord {
    pub id: RecordId,
    pub device_name: String,
    pub date_received: NaiveDate,
    pub decision_date: NaiveDate,
    pub decision_time_days: i64,
    pub decision_time_log10: f64,
    pub complexity: ComplexityClass,
    pub product_code: String,
    pub advisory_committee: String,
}

impl AnalyticalRecord {
    /// Projects onto the fields feature engineering uses.
    pub fn to_record(&self) -> Record {
        Record {
            id: self.id.clone(),
            device_name: self.device_name.clone(),
            complexity: self.complexity,
            decision_time_log10: self.decision_time_log10,
        }
    }
}

/// Parses a date in `MM/DD/YYYY` or ISO form.
pub fn parse_date(record: &RecordId, column: &'static str, value: &str) -> CorpusResult<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| CorpusError::InvalidDate {
            record: record.clone(),
            column,
            value: value.to_string(),
        })
}

/// Thresholds and filters applied when preparing the analytical dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingRules {
    pub low_max_days: i64,
    pub medium_max_days: i64,
    pub min_decision_date: NaiveDate,
    pub third_party: String,
    pub submission_type: String,
    pub decision: String,
}

impl Default for LabelingRules {
    fn default() -> Self {
        Self {
            low_max_days: LOW_MAX_DAYS,
            medium_max_days: MEDIUM_MAX_DAYS,
            min_decision_date: MDUFA_II_START,
            third_party: "N".to_string(),
            submission_type: "Traditional".to_string(),
            decision: "SESE".to_string(),
        }
    }
}

impl LabelingRules {
    /// Maps a decision time to its complexity class.
    pub fn classify(&self, decision_time_days: i64) -> ComplexityClass {
        if decision_time_days <= self.low_max_days {
            ComplexityClass::Low
        } else if decision_time_days <= self.medium_max_days {
            ComplexityClass::Medium
        } else {
            ComplexityClass::High
        }
    }

    /// Whether a submission passes the analytical filters.
    pub fn retains(&self, submission: &Submission) -> bool {
        submission.decision_date >= self.min_decision_date
            && submission.third_party.trim() == self.third_party
            && submission.submission_type.trim() == self.submission_type
            && submission.decision.trim() == self.decision
    }

    /// Labels a single submission, or `None` if it is filtered out.
    pub fn label(&self, submission: &Submission) -> Option<AnalyticalRecord> {
        if !self.retains(submission) {
            return None;
        }

        let days = (submission.decision_date - submission.date_received).num_days();
        if days < 1 {
            return None;
        }

        Some(AnalyticalRecord {
            id: submission.id.clone(),
            device_name: submission.device_name.clone(),
            date_received: submission.date_received,
            decision_date: submission.decision_date,
            decision_time_days: days,
            decision_time_log10: (days as f64).log10(),
            complexity: self.classify(days),
            product_code: submission.product_code.clone(),
            advisory_committee: submission.advisory_committee.clone(),
        })
    }

    /// Filters and labels a batch of submissions, preserving input order.
    pub fn prepare(&self, submissions: &[Submission]) -> Vec<AnalyticalRecord> {
        let mut sub_day = 0usize;
        let mut prepared = Vec::new();

        for submission in submissions.iter().filter(|s| self.retains(s)) {
            match self.label(submission) {
                Some(record) => prepared.push(record),
                None => sub_day += 1,
            }
        }

        if sub_day > 0 {
            warn!(dropped = sub_day, "dropped submissions decided in under one day");
        }
        info!(
            submissions = submissions.len(),
            retained = prepared.len(),
            "prepared analytical records"
        );

        prepared
    }
}
