//! Submission dumps and analytical datasets.
//!
//! The raw dump is pipe-delimited ISO-8859-1 with `MM/DD/YYYY` dates. The
//! analytical dataset is a comma-separated UTF-8 file written by
//! [`write_analytical`], with ISO dates.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use featsel_core::labeling::parse_date;
use featsel_core::config::ColumnNames;
use featsel_core::{AnalyticalRecord, ComplexityClass, Record, RecordId, Submission};
use tracing::info;

use crate::artifact::write_artifact;
use crate::error::{StoreError, StoreResult};

/// Column names of the raw submission dump.
pub mod raw {
    pub const ID: &str = "KNUMBER";
    pub const DEVICE_NAME: &str = "DEVICENAME";
    pub const DATE_RECEIVED: &str = "DATERECEIVED";
    pub const DECISION_DATE: &str = "DECISIONDATE";
    pub const THIRD_PARTY: &str = "THIRDPARTY";
    pub const TYPE: &str = "TYPE";
    pub const DECISION: &str = "DECISION";
    pub const PRODUCT_CODE: &str = "PRODUCTCODE";
    pub const ADVISORY_COMMITTEE: &str = "CLASSADVISECOMM";
}

/// Header of the analytical dataset, in column order.
pub const ANALYTICAL_HEADER: [&str; 9] = [
    "KNUMBER",
    "DEVICENAME",
    "DATERECEIVED",
    "DECISIONDATE",
    "DECISION_TIME_DAYS",
    "DECISION_TIME_DAYS_LOG10",
    "COMPLEXITY",
    "PRODUCTCODE",
    "CLASSADVISECOMM",
];

/// Position of a named column in a header row.
pub(crate) fn column_index(headers: &StringRecord, column: &str, path: &Path) -> StoreResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| StoreError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

fn cell<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or("")
}

/// ISO-8859-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Reads the raw submission dump. A missing or unparsable date fails the
/// whole read, naming the record and column.
pub fn read_submissions(path: &Path) -> StoreResult<Vec<Submission>> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    let content = decode_latin1(&bytes);

    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let id = column_index(&headers, raw::ID, path)?;
    let name = column_index(&headers, raw::DEVICE_NAME, path)?;
    let received = column_index(&headers, raw::DATE_RECEIVED, path)?;
    let decided = column_index(&headers, raw::DECISION_DATE, path)?;
    let third_party = column_index(&headers, raw::THIRD_PARTY, path)?;
    let kind = column_index(&headers, raw::TYPE, path)?;
    let decision = column_index(&headers, raw::DECISION, path)?;
    let product_code = column_index(&headers, raw::PRODUCT_CODE, path)?;
    let committee = column_index(&headers, raw::ADVISORY_COMMITTEE, path)?;

    let mut submissions = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record_id = RecordId::from(cell(&row, id));

        let date_received = parse_date(&record_id, raw::DATE_RECEIVED, cell(&row, received))?;
        let decision_date = parse_date(&record_id, raw::DECISION_DATE, cell(&row, decided))?;

        submissions.push(Submission {
            id: record_id,
            device_name: cell(&row, name).to_string(),
            date_received,
            decision_date,
            third_party: cell(&row, third_party).to_string(),
            submission_type: cell(&row, kind).to_string(),
            decision: cell(&row, decision).to_string(),
            product_code: cell(&row, product_code).to_string(),
            advisory_committee: cell(&row, committee).to_string(),
        });
    }

    info!(
        path = %path.display(),
        submissions = submissions.len(),
        "read submission dump"
    );
    Ok(submissions)
}

/// Writes the analytical dataset.
pub fn write_analytical(path: &Path, records: &[AnalyticalRecord]) -> StoreResult<()> {
    write_artifact(path, |w| {
        let mut writer = WriterBuilder::new().from_writer(w);
        writer.write_record(ANALYTICAL_HEADER)?;
        for r in records {
            writer.write_record([
                r.id.to_string(),
                r.device_name.clone(),
                r.date_received.format("%Y-%m-%d").to_string(),
                r.decision_date.format("%Y-%m-%d").to_string(),
                r.decision_time_days.to_string(),
                r.decision_time_log10.to_string(),
                r.complexity.code().to_string(),
                r.product_code.clone(),
                r.advisory_committee.clone(),
            ])?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })
}

fn parse_cell<T: std::str::FromStr>(
    row: &StringRecord,
    index: usize,
    line: usize,
    column: &str,
) -> StoreResult<T>
where
    T::Err: std::fmt::Display,
{
    let value = cell(row, index);
    value.parse().map_err(|e: T::Err| StoreError::Malformed {
        row: line,
        column: column.to_string(),
        reason: format!("{value:?}: {e}"),
    })
}

fn open(path: &Path) -> StoreResult<csv::Reader<fs::File>> {
    let file = fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    Ok(ReaderBuilder::new().trim(Trim::All).from_reader(file))
}

/// Reads the analytical dataset written by [`write_analytical`].
pub fn read_analytical(path: &Path) -> StoreResult<Vec<AnalyticalRecord>> {
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();
    let [id, name, received, decided, days, log10, complexity, product_code, committee] =
        ANALYTICAL_HEADER.map(|c| column_index(&headers, c, path));
    let (id, name, received, decided) = (id?, name?, received?, decided?);
    let (days, log10, complexity) = (days?, log10?, complexity?);
    let (product_code, committee) = (product_code?, committee?);

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row = result?;
        let line = line + 1;
        let record_id = RecordId::from(cell(&row, id));

        records.push(AnalyticalRecord {
            date_received: parse_date(&record_id, "DATERECEIVED", cell(&row, received))?,
            decision_date: parse_date(&record_id, "DECISIONDATE", cell(&row, decided))?,
            device_name: cell(&row, name).to_string(),
            decision_time_days: parse_cell(&row, days, line, ANALYTICAL_HEADER[4])?,
            decision_time_log10: parse_cell(&row, log10, line, ANALYTICAL_HEADER[5])?,
            complexity: parse_cell::<ComplexityClass>(&row, complexity, line, ANALYTICAL_HEADER[6])?,
            product_code: cell(&row, product_code).to_string(),
            advisory_committee: cell(&row, committee).to_string(),
            id: record_id,
        });
    }
    Ok(records)
}

/// Reads the labeled records selection runs on, using the configured
/// column names. Extra columns are ignored.
pub fn read_records(path: &Path, columns: &ColumnNames) -> StoreResult<Vec<Record>> {
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();
    let id = column_index(&headers, &columns.id, path)?;
    let text = column_index(&headers, &columns.text, path)?;
    let complexity = column_index(&headers, &columns.complexity, path)?;
    let outcome = column_index(&headers, &columns.outcome, path)?;

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row = result?;
        let line = line + 1;
        records.push(Record::new(
            cell(&row, id),
            cell(&row, text),
            parse_cell::<ComplexityClass>(&row, complexity, line, &columns.complexity)?,
            parse_cell::<f64>(&row, outcome, line, &columns.outcome)?,
        ));
    }

    info!(path = %path.display(), records = records.len(), "read labeled records");
    Ok(records)
}
