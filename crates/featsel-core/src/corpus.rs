//! Immutable corpus snapshot.
//!
//! A [`Corpus`] is the single canonical training set every phase reads
//! from. It is built once (validated, restricted to the training partition)
//! and then only borrowed. Row indices into the corpus are the row indices
//! of every document-feature matrix built from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{CorpusError, CorpusResult};
use crate::types::{ComplexityClass, Record, RecordId};

/// blake3 digest identifying the exact contents of a corpus.
///
/// Stored next to every persisted artifact so a reloaded sweep can be
/// matched against the corpus that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorpusFingerprint(pub String);

impl fmt::Display for CorpusFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated, read-only set of training records.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<Record>,
    fingerprint: CorpusFingerprint,
}

impl Corpus {
    /// Builds a corpus from already-selected records.
    ///
    /// Fails on an empty input, a duplicate identifier or an invalid
    /// continuous outcome.
    pub fn new(records: Vec<Record>) -> CorpusResult<Self> {
        if records.is_empty() {
            return Err(CorpusError::Empty("no records supplied".to_string()));
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate()?;
            if !seen.insert(&record.id) {
                return Err(CorpusError::DuplicateRecord(record.id.clone()));
            }
        }

        let fingerprint = fingerprint(&records);
        Ok(Self {
            records,
            fingerprint,
        })
    }

    /// Prepares the training corpus: keeps exactly the records whose id is
    /// in `train_ids`, in dataset order.
    ///
    /// Every training id must exist in `records`; a dangling id means the
    /// partition list and the dataset are out of sync.
    pub fn training(records: Vec<Record>, train_ids: &[RecordId]) -> CorpusResult<Self> {
        let wanted: HashSet<&RecordId> = train_ids.iter().collect();
        let present: HashSet<&RecordId> = records.iter().map(|r| &r.id).collect();

        if let Some(missing) = train_ids.iter().find(|id| !present.contains(id)) {
            return Err(CorpusError::UnknownTrainingId(missing.clone()));
        }

        let selected: Vec<Record> = records
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(CorpusError::Empty(
                "training partition selects no records".to_string(),
            ));
        }

        Self::new(selected)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed corpus; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in corpus order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at a row index.
    pub fn get(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }

    /// Device names in corpus order.
    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.device_name.as_str())
    }

    /// Complexity labels in corpus order.
    pub fn complexities(&self) -> Vec<ComplexityClass> {
        self.records.iter().map(|r| r.complexity).collect()
    }

    /// Continuous outcomes in corpus order.
    pub fn outcomes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.decision_time_log10).collect()
    }

    /// Content digest of this corpus.
    pub fn fingerprint(&self) -> &CorpusFingerprint {
        &self.fingerprint
    }
}

fn fingerprint(records: &[Record]) -> CorpusFingerprint {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        hasher.update(record.id.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(record.device_name.as_bytes());
        hasher.update(&[0]);
        hasher.update(record.complexity.code().as_bytes());
        hasher.update(&record.decision_time_log10.to_le_bytes());
    }
    CorpusFingerprint(hex::encode(hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("K1", "blood pressure monitor", ComplexityClass::Low, 1.9),
            Record::new("K2", "catheter", ComplexityClass::Medium, 2.2),
            Record::new("K3", "infusion pump", ComplexityClass::High, 2.6),
        ]
    }

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(Corpus::new(vec![]), Err(CorpusError::Empty(_))));
    }

    #[test]
    fn new_rejects_duplicates() {
        let mut records = sample();
        records.push(Record::new("K1", "again", ComplexityClass::Low, 1.0));
        assert_eq!(
            Corpus::new(records).unwrap_err(),
            CorpusError::DuplicateRecord(RecordId::new("K1"))
        );
    }

    #[test]
    fn new_rejects_invalid_outcome() {
        let mut records = sample();
        records[1].decision_time_log10 = f64::INFINITY;
        assert!(matches!(
            Corpus::new(records),
            Err(CorpusError::InvalidOutcome { .. })
        ));
    }

    #[test]
    fn training_keeps_dataset_order() {
        let ids = vec![RecordId::new("K3"), RecordId::new("K1")];
        let corpus = Corpus::training(sample(), &ids).unwrap();

        let kept: Vec<&str> = corpus.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(kept, vec!["K1", "K3"]);
    }

    #[test]
    fn training_rejects_unknown_id() {
        let ids = vec![RecordId::new("K9")];
        assert_eq!(
            Corpus::training(sample(), &ids).unwrap_err(),
            CorpusError::UnknownTrainingId(RecordId::new("K9"))
        );
    }

    #[test]
    fn training_rejects_empty_selection() {
        assert!(matches!(
            Corpus::training(sample(), &[]),
            Err(CorpusError::Empty(_))
        ));
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = Corpus::new(sample()).unwrap();
        let b = Corpus::new(sample()).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut changed = sample();
        changed[0].device_name.push('s');
        let c = Corpus::new(changed).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
