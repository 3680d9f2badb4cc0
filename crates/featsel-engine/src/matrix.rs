//! Binary record × feature incidence matrix.
//!
//! Columns are an explicit list of feature names; entries are 1 when the
//! record's feature set contains the feature. The matrix is stored
//! column-wise as sorted row indices, which is the access pattern of the
//! distance engine (all rows of one feature at a time) and keeps memory
//! proportional to the number of non-zero entries.

use std::collections::HashMap;

use crate::tokenize::FeatureSet;

/// Sparse column-major incidence matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceMatrix {
    row_count: usize,
    columns: Vec<String>,
    rows_by_column: Vec<Vec<usize>>,
}

impl IncidenceMatrix {
    /// Builds the matrix for `columns` in one pass over the corpus.
    ///
    /// Duplicate column names share the incidence of their first occurrence.
    pub fn build<S: AsRef<str>>(documents: &[FeatureSet], columns: &[S]) -> Self {
        let names: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(names.len());
        for (col, name) in names.iter().enumerate() {
            index.entry(name.as_str()).or_insert(col);
        }

        let mut rows_by_column = vec![Vec::new(); names.len()];
        for (row, document) in documents.iter().enumerate() {
            for token in document {
                if let Some(&col) = index.get(token.as_str()) {
                    rows_by_column[col].push(row);
                }
            }
        }

        for (col, name) in names.iter().enumerate() {
            let first = index[name.as_str()];
            if first != col {
                rows_by_column[col] = rows_by_column[first].clone();
            }
        }

        Self {
            row_count: documents.len(),
            columns: names,
            rows_by_column,
        }
    }

    /// Number of rows (records).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns (features).
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in matrix order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Sorted row indices where column `col` is 1.
    pub fn column_rows(&self, col: usize) -> &[usize] {
        &self.rows_by_column[col]
    }

    /// Number of rows where column `col` is 1.
    pub fn column_support(&self, col: usize) -> usize {
        self.rows_by_column[col].len()
    }

    /// Entry at (row, col): 1 if present, else 0.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        u8::from(self.rows_by_column[col].binary_search(&row).is_ok())
    }

    /// Dense 0/1 row.
    pub fn dense_row(&self, row: usize) -> Vec<u8> {
        (0..self.columns.len()).map(|col| self.get(row, col)).collect()
    }

    /// Keeps only columns with at least one non-zero entry; returns the
    /// names of the dropped columns.
    pub fn retain_nonzero_columns(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut rows_by_column = Vec::with_capacity(self.columns.len());

        for (name, rows) in self.columns.drain(..).zip(self.rows_by_column.drain(..)) {
            if rows.is_empty() {
                dropped.push(name);
            } else {
                columns.push(name);
                rows_by_column.push(rows);
            }
        }

        self.columns = columns;
        self.rows_by_column = rows_by_column;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<FeatureSet> {
        vec![
            ["pump", "infus"].iter().map(|s| s.to_string()).collect(),
            ["stent"].iter().map(|s| s.to_string()).collect(),
            FeatureSet::new(),
            ["pump", "stent"].iter().map(|s| s.to_string()).collect(),
        ]
    }

    #[test]
    fn build_binary_incidence() {
        let matrix = IncidenceMatrix::build(&docs(), &["pump", "stent", "laser"]);

        assert_eq!(matrix.row_count(), 4);
        assert_eq!(matrix.column_count(), 3);
        assert_eq!(matrix.column_rows(0), &[0, 3]);
        assert_eq!(matrix.column_rows(1), &[1, 3]);
        assert!(matrix.column_rows(2).is_empty());
        assert_eq!(matrix.dense_row(3), vec![1, 1, 0]);
        assert_eq!(matrix.dense_row(2), vec![0, 0, 0]);
    }

    #[test]
    fn duplicate_columns_share_incidence() {
        let matrix = IncidenceMatrix::build(&docs(), &["pump", "pump"]);
        assert_eq!(matrix.column_rows(0), matrix.column_rows(1));
        assert_eq!(matrix.column_support(1), 2);
    }

    #[test]
    fn retain_nonzero_columns_drops_unmatched() {
        let mut matrix = IncidenceMatrix::build(&docs(), &["laser", "pump"]);
        let dropped = matrix.retain_nonzero_columns();

        assert_eq!(dropped, vec!["laser".to_string()]);
        assert_eq!(matrix.columns(), &["pump".to_string()]);
        assert_eq!(matrix.get(0, 0), 1);
        assert_eq!(matrix.get(1, 0), 0);
    }
}
