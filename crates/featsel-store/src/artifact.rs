//! Write-once artifacts.
//!
//! Every artifact is written to a temporary file in the target directory,
//! flushed and synced, then renamed over the destination. A failed write
//! removes the temporary file and leaves no partial output behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use featsel_core::{CorpusFingerprint, FramingKind};
use featsel_engine::{SelectedFeatureSet, SweepReport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Writes `path` atomically with the bytes produced by `write`.
pub fn write_artifact<F>(path: &Path, write: F) -> StoreResult<()>
where
    F: FnOnce(&mut dyn Write) -> StoreResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| StoreError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Writes a value as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    write_artifact(path, |w| {
        serde_json::to_writer_pretty(&mut *w, value)?;
        w.write_all(b"\n").map_err(|e| StoreError::io(path, e))
    })
}

/// Reads a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// `sweep_<framing>.json` inside `dir`.
pub fn sweep_path(dir: &Path, framing: FramingKind) -> PathBuf {
    dir.join(format!("sweep_{}.json", framing.name()))
}

/// `selected_<framing>.json` inside `dir`.
pub fn selected_path(dir: &Path, framing: FramingKind) -> PathBuf {
    dir.join(format!("selected_{}.json", framing.name()))
}

pub fn write_sweep_report(path: &Path, report: &SweepReport) -> StoreResult<()> {
    write_json(path, report)
}

/// Reloads a sweep artifact. With `expected` set, the artifact must have
/// been produced from a corpus with that fingerprint.
pub fn read_sweep_report(
    path: &Path,
    expected: Option<&CorpusFingerprint>,
) -> StoreResult<SweepReport> {
    let report: SweepReport = read_json(path)?;
    if let Some(expected) = expected {
        if &report.fingerprint != expected {
            return Err(StoreError::FingerprintMismatch {
                path: path.to_path_buf(),
                expected: expected.clone(),
                found: report.fingerprint,
            });
        }
    }
    Ok(report)
}

pub fn write_selected(path: &Path, selected: &SelectedFeatureSet) -> StoreResult<()> {
    write_json(path, selected)
}

pub fn read_selected(path: &Path) -> StoreResult<SelectedFeatureSet> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use featsel_engine::{Grid, SweepRecord};
    use tempfile::TempDir;

    fn report(fingerprint: &str) -> SweepReport {
        SweepReport {
            framing: FramingKind::Categorical,
            fingerprint: CorpusFingerprint(fingerprint.to_string()),
            corpus_size: 100,
            grid: Grid::new(vec![10, 20]).unwrap(),
            records: vec![SweepRecord {
                k: 10,
                feature_count: 10,
                median_document_frequency: 4.5,
                median_distance: 0.125,
                total_distance: 1.5,
            }],
        }
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let result = write_artifact(&path, |w| {
            w.write_all(b"partial").unwrap();
            Err(StoreError::Malformed {
                row: 1,
                column: "x".to_string(),
                reason: "boom".to_string(),
            })
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();

        write_artifact(&path, |w| w.write_all(b"new").map_err(|e| StoreError::io("out.txt", e)))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn sweep_report_reloads() {
        let dir = TempDir::new().unwrap();
        let path = sweep_path(dir.path(), FramingKind::Categorical);
        assert!(path.ends_with("sweep_complexity.json"));

        write_sweep_report(&path, &report("abc")).unwrap();
        let loaded =
            read_sweep_report(&path, Some(&CorpusFingerprint("abc".to_string()))).unwrap();
        assert_eq!(loaded, report("abc"));
    }

    #[test]
    fn sweep_report_from_other_corpus_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sweep.json");
        write_sweep_report(&path, &report("abc")).unwrap();

        let err = read_sweep_report(&path, Some(&CorpusFingerprint("def".to_string())))
            .unwrap_err();
        assert!(matches!(err, StoreError::FingerprintMismatch { .. }));
    }

    #[test]
    fn identical_reports_write_identical_bytes() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        write_sweep_report(&a, &report("abc")).unwrap();
        write_sweep_report(&b, &report("abc")).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }
}
