//! Binary token features for arbitrary records.
//!
//! Applies an exported token list to records of any partition using the
//! same tokenizer as selection. Tokens that occur in none of the records
//! are dropped from the table.

use featsel_core::{AnalyticalRecord, FeatureTable, RecordId};
use tracing::info;

use crate::error::SelectionResult;
use crate::matrix::IncidenceMatrix;
use crate::tokenize::Tokenizer;

/// Record × token table keyed by record identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenEncoding {
    ids: Vec<RecordId>,
    matrix: IncidenceMatrix,
    dropped: Vec<String>,
}

impl TokenEncoding {
    /// Row identifiers, in input order.
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Kept tokens, in export order.
    pub fn tokens(&self) -> &[String] {
        self.matrix.columns()
    }

    /// Tokens that matched no record.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// 0/1 values of one row, aligned with [`tokens`](Self::tokens).
    pub fn row(&self, row: usize) -> Vec<u8> {
        self.matrix.dense_row(row)
    }

    /// Rows paired with their identifiers.
    pub fn rows(&self) -> impl Iterator<Item = (&RecordId, Vec<u8>)> + '_ {
        self.ids
            .iter()
            .enumerate()
            .map(|(row, id)| (id, self.matrix.dense_row(row)))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Dense copy keyed by record identifier, ready to merge with other
    /// feature tables.
    pub fn to_table(&self) -> SelectionResult<FeatureTable> {
        let mut table = FeatureTable::new(self.tokens().to_vec());
        for (id, values) in self.rows() {
            table.push(id.clone(), values)?;
        }
        Ok(table)
    }
}

/// Encodes records against a fixed token list.
pub struct TokenEncoder<'a> {
    tokenizer: &'a Tokenizer,
}

impl<'a> TokenEncoder<'a> {
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn encode<S: AsRef<str>>(&self, records: &[AnalyticalRecord], tokens: &[S]) -> TokenEncoding {
        let names: Vec<&str> = records.iter().map(|r| r.device_name.as_str()).collect();
        let documents = self.tokenizer.tokenize_all(&names);

        let mut matrix = IncidenceMatrix::build(&documents, tokens);
        let dropped = matrix.retain_nonzero_columns();

        if !dropped.is_empty() {
            info!(
                dropped = dropped.len(),
                tokens = ?dropped,
                "dropping tokens that match no record"
            );
        }
        info!(
            records = records.len(),
            columns = matrix.column_count(),
            "encoded token features"
        );

        TokenEncoding {
            ids: records.iter().map(|r| r.id.clone()).collect(),
            matrix,
            dropped,
        }
    }
}
