//! Exported feature list and encoded token tables.
//!
//! The feature list is written with a leading unnamed index column and a
//! `tokens` column, the layout downstream encoders look tokens up by.
//! Feature tables are keyed by the id column and hold 0/1 values.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use featsel_core::{FeatureTable, RecordId};

use crate::artifact::write_artifact;
use crate::dataset::column_index;
use crate::error::{StoreError, StoreResult};

/// Name of the token column of the exported feature list.
pub const TOKENS_COLUMN: &str = "tokens";

/// File name of the exported feature list for a text column.
pub fn token_dict_name(text_column: &str) -> String {
    format!("token_dict_{text_column}.csv")
}

/// Writes the feature list: header `,tokens`, then `<index>,<token>`.
pub fn write_token_dict<S: AsRef<str>>(path: &Path, tokens: &[S]) -> StoreResult<()> {
    write_artifact(path, |w| {
        let mut writer = WriterBuilder::new().from_writer(w);
        writer.write_record(["", TOKENS_COLUMN])?;
        for (index, token) in tokens.iter().enumerate() {
            writer.write_record([index.to_string().as_str(), token.as_ref()])?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })
}

/// Reads the `tokens` column of an exported feature list.
pub fn read_token_dict(path: &Path) -> StoreResult<Vec<String>> {
    let file = fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut reader = ReaderBuilder::new().from_reader(file);
    let index = column_index(reader.headers()?, TOKENS_COLUMN, path)?;

    let mut tokens = Vec::new();
    for result in reader.records() {
        let row = result?;
        if let Some(token) = row.get(index).filter(|t| !t.is_empty()) {
            tokens.push(token.to_string());
        }
    }
    Ok(tokens)
}

/// File name of the dummy feature table `prepare` writes and `encode`
/// extends.
pub const DUMMY_FEATURES_FILE: &str = "features_dummy.csv";

/// Writes a feature table: the id column, then one 0/1 column per feature.
pub fn write_feature_table(path: &Path, id_column: &str, table: &FeatureTable) -> StoreResult<()> {
    write_artifact(path, |w| {
        let mut writer = WriterBuilder::new().from_writer(w);

        let mut header = vec![id_column];
        header.extend(table.columns().iter().map(String::as_str));
        writer.write_record(&header)?;

        for (id, values) in table.rows() {
            let mut row = Vec::with_capacity(values.len() + 1);
            row.push(id.to_string());
            row.extend(values.iter().map(|v| v.to_string()));
            writer.write_record(&row)?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })
}

/// Reads a feature table written by [`write_feature_table`]. Every column
/// other than `id_column` must hold 0 or 1.
pub fn read_feature_table(path: &Path, id_column: &str) -> StoreResult<FeatureTable> {
    let file = fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    let headers = reader.headers()?.clone();
    let id = column_index(&headers, id_column, path)?;

    let features: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != id)
        .map(|(i, name)| (i, name.to_string()))
        .collect();
    let mut table = FeatureTable::new(features.iter().map(|(_, name)| name.clone()).collect());

    for (line, result) in reader.records().enumerate() {
        let row = result?;
        let values = features
            .iter()
            .map(|(i, name)| match row.get(*i).unwrap_or("") {
                "0" => Ok(0),
                "1" => Ok(1),
                other => Err(StoreError::Malformed {
                    row: line + 1,
                    column: name.clone(),
                    reason: format!("{other:?} is not 0 or 1"),
                }),
            })
            .collect::<StoreResult<Vec<u8>>>()?;
        table.push(RecordId::from(row.get(id).unwrap_or("")), values)?;
    }
    Ok(table)
}
