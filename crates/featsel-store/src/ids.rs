//! Single-column identifier lists (`train_KNUMBER.csv` and friends).

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use featsel_core::{Partition, RecordId};

use crate::artifact::write_artifact;
use crate::dataset::column_index;
use crate::error::{StoreError, StoreResult};

/// `<partition>_<column>.csv` inside `dir`.
pub fn id_list_path(dir: &Path, partition: Partition, column: &str) -> PathBuf {
    dir.join(format!("{}_{column}.csv", partition.name()))
}

/// Writes identifiers under a one-column header.
pub fn write_ids(path: &Path, column: &str, ids: &[RecordId]) -> StoreResult<()> {
    write_artifact(path, |w| {
        let mut writer = WriterBuilder::new().from_writer(w);
        writer.write_record([column])?;
        for id in ids {
            writer.write_record([id.as_str()])?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })
}

/// Reads identifiers from the named column; other columns are ignored.
pub fn read_ids(path: &Path, column: &str) -> StoreResult<Vec<RecordId>> {
    let file = fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    let index = column_index(reader.headers()?, column, path)?;

    let mut ids = Vec::new();
    for result in reader.records() {
        let row = result?;
        if let Some(value) = row.get(index).filter(|v| !v.is_empty()) {
            ids.push(RecordId::from(value));
        }
    }
    Ok(ids)
}
