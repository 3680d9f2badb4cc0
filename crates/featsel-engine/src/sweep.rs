//! Filter-strength sweep and operating-point selection.
//!
//! ## Algorithm
//!
//! For every K of a strictly increasing grid:
//! 1. take the top-K vocabulary tokens by document frequency
//! 2. score them against the framing's reference
//! 3. record K, the median document frequency of the K tokens, and the
//!    median and total distance of the scored features
//!
//! Top-K is prefix-stable, so the largest K is scored once and every smaller
//! K is evaluated on a prefix of that result. This produces exactly the
//! records that scoring each K separately would.
//!
//! The operating point is the largest K whose median document frequency,
//! as a percentage of the corpus, is still at least the support floor.

use featsel_core::{CorpusFingerprint, FramingKind};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::distance::{DistanceEngine, FeatureScore, ScoredFeatures};
use crate::error::{SelectionError, SelectionResult};
use crate::reference::{Distribution, round_frequency};
use crate::vocabulary::Vocabulary;

/// Default minimum median support, in percent of the corpus.
pub const DEFAULT_MIN_SUPPORT_PCT: f64 = 0.5;

/// Default number of features selected at the operating point.
pub const DEFAULT_TOP_N: usize = 50;

/// Strictly increasing list of candidate K values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(Vec<usize>);

impl Grid {
    /// Validates an explicit grid: non-empty, no zero, strictly increasing.
    pub fn new(values: Vec<usize>) -> SelectionResult<Self> {
        if values.is_empty() {
            return Err(SelectionError::InvalidGrid("grid is empty".to_string()));
        }
        if values.contains(&0) {
            return Err(SelectionError::InvalidGrid(
                "grid values must be at least 1".to_string(),
            ));
        }
        if let Some(pair) = values.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SelectionError::InvalidGrid(format!(
                "grid must be strictly increasing, found {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(values))
    }

    /// `points` evenly spaced values from `start` to `end` inclusive,
    /// rounded to the nearest integer with duplicates removed.
    pub fn linspace(start: usize, end: usize, points: usize) -> SelectionResult<Self> {
        if points == 0 {
            return Err(SelectionError::InvalidGrid("grid needs at least one point".to_string()));
        }
        if end < start {
            return Err(SelectionError::InvalidGrid(format!(
                "grid end {end} is below start {start}"
            )));
        }

        let mut values: Vec<usize> = if points == 1 {
            vec![start]
        } else {
            let step = (end - start) as f64 / (points - 1) as f64;
            (0..points)
                .map(|i| (start as f64 + step * i as f64).round() as usize)
                .collect()
        };
        values.dedup();
        Self::new(values)
    }

    pub fn values(&self) -> &[usize] {
        &self.0
    }

    /// Largest K.
    pub fn max(&self) -> usize {
        // Never empty after construction.
        self.0.last().copied().unwrap_or(0)
    }
}

/// One swept filter-strength value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Requested number of top tokens.
    pub k: usize,

    /// Tokens actually available (below `k` for small vocabularies).
    pub feature_count: usize,

    /// Median document frequency among the K tokens.
    pub median_document_frequency: f64,

    /// Median distance of the scored features (the objective).
    pub median_distance: f64,

    /// Sum of the scored features' distances.
    pub total_distance: f64,
}

impl SweepRecord {
    /// Median document frequency as a percentage of the corpus size.
    pub fn support_pct(&self, corpus_size: usize) -> f64 {
        if corpus_size == 0 {
            return 0.0;
        }
        self.median_document_frequency * 100.0 / corpus_size as f64
    }
}

/// The chosen K and its support.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub k: usize,
    pub support_pct: f64,
}

/// Full result of one sweep; the persisted sweep artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub framing: FramingKind,
    pub fingerprint: CorpusFingerprint,
    pub corpus_size: usize,
    pub grid: Grid,
    pub records: Vec<SweepRecord>,
}

impl SweepReport {
    /// Picks the largest K whose support is at least `min_support_pct`.
    pub fn operating_point(&self, min_support_pct: f64) -> SelectionResult<OperatingPoint> {
        let feasible = self
            .records
            .iter()
            .map(|r| (r.k, r.support_pct(self.corpus_size)))
            .filter(|(_, pct)| *pct >= min_support_pct)
            .max_by_key(|(k, _)| *k);

        match feasible {
            Some((k, support_pct)) => Ok(OperatingPoint { k, support_pct }),
            None => Err(SelectionError::NoFeasibleOperatingPoint {
                min_support_pct,
                best_support_pct: self
                    .records
                    .iter()
                    .map(|r| r.support_pct(self.corpus_size))
                    .fold(0.0, f64::max),
            }),
        }
    }
}

/// A selected feature with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFeature {
    pub token: String,
    pub distance: f64,
    pub document_frequency: usize,
    pub distribution: Distribution,
}

impl From<FeatureScore> for SelectedFeature {
    fn from(score: FeatureScore) -> Self {
        Self {
            token: score.token,
            distance: score.distance,
            document_frequency: score.document_frequency,
            distribution: score.distribution,
        }
    }
}

/// Top-N features of one framing at its operating point, most distant
/// first; the persisted selection artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFeatureSet {
    pub framing: FramingKind,
    pub fingerprint: CorpusFingerprint,
    pub operating_point: OperatingPoint,
    /// Slot labels the feature distributions are aligned with.
    pub labels: Vec<String>,
    pub reference: Distribution,
    pub features: Vec<SelectedFeature>,
}

impl SelectedFeatureSet {
    /// Feature strings in selection order.
    pub fn tokens(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.token.as_str()).collect()
    }
}

/// Median of a list; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Drives the distance engine across a grid of K values.
pub struct SweepOptimizer<'a> {
    vocabulary: &'a Vocabulary,
    engine: DistanceEngine<'a>,
    fingerprint: CorpusFingerprint,
}

impl<'a> SweepOptimizer<'a> {
    pub fn new(
        vocabulary: &'a Vocabulary,
        engine: DistanceEngine<'a>,
        fingerprint: CorpusFingerprint,
    ) -> Self {
        Self {
            vocabulary,
            engine,
            fingerprint,
        }
    }

    /// Runs the sweep. Returns the report and the scores of the largest K,
    /// which every smaller K is a prefix of.
    pub fn sweep(&self, grid: &Grid) -> SelectionResult<(SweepReport, ScoredFeatures)> {
        if self.vocabulary.is_empty() {
            return Err(SelectionError::EmptyVocabulary);
        }

        let framing = self.engine.framing().kind();
        let pool = self.vocabulary.top_k(grid.max());
        let scored = self.engine.score(pool);

        info!(
            framing = %framing,
            candidates = pool.len(),
            scored = scored.scores.len(),
            excluded = scored.exclusions.len(),
            "scored sweep candidate pool"
        );

        let mut records = Vec::with_capacity(grid.values().len());
        for &k in grid.values() {
            let tokens = self.vocabulary.top_k(k);
            let in_prefix = scored.within(tokens.len());
            if in_prefix.is_empty() {
                return Err(SelectionError::EmptyCandidateSet { k });
            }

            let frequencies: Vec<f64> = tokens
                .iter()
                .map(|t| t.document_frequency as f64)
                .collect();
            let distances: Vec<f64> = in_prefix.iter().map(|s| s.distance).collect();

            records.push(SweepRecord {
                k,
                feature_count: tokens.len(),
                median_document_frequency: round_frequency(median(&frequencies).unwrap_or(0.0)),
                median_distance: round_frequency(median(&distances).unwrap_or(0.0)),
                total_distance: round_frequency(distances.iter().sum()),
            });
        }

        let report = SweepReport {
            framing,
            fingerprint: self.fingerprint.clone(),
            corpus_size: self.vocabulary.document_count(),
            grid: grid.clone(),
            records,
        };
        Ok((report, scored))
    }

    /// Top-N features among the top-K tokens.
    pub fn select(
        &self,
        scored: &ScoredFeatures,
        point: OperatingPoint,
        top_n: usize,
    ) -> SelectionResult<SelectedFeatureSet> {
        let tokens = self.vocabulary.top_k(point.k);
        let in_prefix = scored.within(tokens.len());
        if in_prefix.is_empty() {
            return Err(SelectionError::EmptyCandidateSet { k: point.k });
        }

        let framing = self.engine.framing();
        let features = crate::distance::top_n(in_prefix, top_n)
            .into_iter()
            .map(SelectedFeature::from)
            .collect();

        Ok(SelectedFeatureSet {
            framing: framing.kind(),
            fingerprint: self.fingerprint.clone(),
            operating_point: point,
            labels: framing.labels(),
            reference: framing.reference().clone(),
            features,
        })
    }
}
