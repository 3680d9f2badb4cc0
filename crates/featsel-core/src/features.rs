//! Binary feature tables keyed by record identifier.
//!
//! ## Categorical dummies
//!
//! `PRODUCTCODE` and `CLASSADVISECOMM` are one-hot encoded against a fixed
//! list of categories chosen up front, one `<FIELD>_<category>` column per
//! entry. Categories outside the list produce no column; listed categories
//! that never occur still produce an all-zero column, so every run has the
//! same layout.
//!
//! ## Merging
//!
//! [`FeatureTable::merge`] is an inner join on the identifier: rows of the
//! left table whose id also appears on the right, in left order, with the
//! right table's columns appended.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CorpusError, CorpusResult};
use crate::labeling::AnalyticalRecord;
use crate::types::RecordId;

/// Column prefix of the product-code dummies.
pub const PRODUCT_CODE: &str = "PRODUCTCODE";

/// Column prefix of the advisory-committee dummies.
pub const ADVISORY_COMMITTEE: &str = "CLASSADVISECOMM";

/// Categories that get an indicator column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DummyCategories {
    pub product_codes: Vec<String>,
    pub advisory_committees: Vec<String>,
}

impl Default for DummyCategories {
    fn default() -> Self {
        let owned =
            |values: &[&str]| -> Vec<String> { values.iter().map(|v| v.to_string()).collect() };
        Self {
            product_codes: owned(&["IYE", "IYN", "JJX", "LYZ", "NBW"]),
            advisory_committees: owned(&["AN", "HE", "IM", "MI", "RA", "TX"]),
        }
    }
}

impl DummyCategories {
    /// Indicator column names, product codes first.
    pub fn column_names(&self) -> Vec<String> {
        self.product_codes
            .iter()
            .map(|c| format!("{PRODUCT_CODE}_{c}"))
            .chain(
                self.advisory_committees
                    .iter()
                    .map(|c| format!("{ADVISORY_COMMITTEE}_{c}")),
            )
            .collect()
    }

    /// Indicator values of one record, aligned with [`column_names`](Self::column_names).
    pub fn indicators(&self, record: &AnalyticalRecord) -> Vec<u8> {
        let product = record.product_code.trim();
        let committee = record.advisory_committee.trim();
        self.product_codes
            .iter()
            .map(|c| u8::from(c == product))
            .chain(self.advisory_committees.iter().map(|c| u8::from(c == committee)))
            .collect()
    }

    /// Dummy table of every record, in input order.
    pub fn table(&self, records: &[AnalyticalRecord]) -> FeatureTable {
        let rows = records
            .iter()
            .map(|r| (r.id.clone(), self.indicators(r)))
            .collect();
        FeatureTable {
            columns: self.column_names(),
            rows,
        }
    }
}

/// Record × feature 0/1 table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<(RecordId, Vec<u8>)>,
}

impl FeatureTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row; it must have one value per column.
    pub fn push(&mut self, id: RecordId, values: Vec<u8>) -> CorpusResult<()> {
        if values.len() != self.columns.len() {
            return Err(CorpusError::RowWidth {
                record: id,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push((id, values));
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = (&RecordId, &[u8])> {
        self.rows.iter().map(|(id, values)| (id, values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of one cell, `None` if the row or column is absent.
    pub fn value(&self, id: &RecordId, column: &str) -> Option<u8> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|(row_id, _)| row_id == id)
            .map(|(_, values)| values[col])
    }

    /// Joins `other` onto this table by identifier.
    ///
    /// Columns present in both tables take `other`'s values, so merging the
    /// same features twice does not duplicate them.
    pub fn merge(&self, other: &FeatureTable) -> FeatureTable {
        let replaced: HashSet<&str> = other.columns.iter().map(String::as_str).collect();
        let kept: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !replaced.contains(self.columns[i].as_str()))
            .collect();

        let mut columns: Vec<String> = kept.iter().map(|&i| self.columns[i].clone()).collect();
        columns.extend(other.columns.iter().cloned());

        let right: HashMap<&RecordId, &Vec<u8>> =
            other.rows.iter().map(|(id, values)| (id, values)).collect();
        let rows: Vec<(RecordId, Vec<u8>)> = self
            .rows
            .iter()
            .filter_map(|(id, values)| {
                let extra = right.get(id)?;
                let mut merged: Vec<u8> = kept.iter().map(|&i| values[i]).collect();
                merged.extend(extra.iter().copied());
                Some((id.clone(), merged))
            })
            .collect();

        let unmatched = self.rows.len() - rows.len();
        if unmatched > 0 {
            info!(unmatched, "dropped rows without a match in the merged table");
        }

        FeatureTable { columns, rows }
    }
}
