//! Outcome distributions: the population reference and per-feature
//! conditionals.
//!
//! Two framings are supported:
//!
//! - **Categorical**: relative frequency of each complexity class, always
//!   laid out as L, M, H.
//! - **Histogram**: relative frequency over equal-width bins partitioning the
//!   observed range of log10 decision time. Bin `i` covers
//!   `[edge_i, edge_{i+1})`; the last bin also includes the maximum.
//!
//! Each framing precomputes the category (or bin) of every corpus row once,
//! so a feature's conditional distribution is guaranteed to use the same
//! alignment and bin edges as the reference. All frequencies are rounded to
//! four decimals.

use featsel_core::{ComplexityClass, Corpus, CorpusError, FramingKind};
use serde::{Deserialize, Serialize};

use crate::error::{SelectionError, SelectionResult};

/// Decimal digits kept in every relative frequency.
pub const FREQUENCY_DECIMALS: i32 = 4;

/// Default number of histogram bins (100 boundary points).
pub const DEFAULT_HISTOGRAM_BINS: usize = 99;

/// Rounds to [`FREQUENCY_DECIMALS`] digits.
pub fn round_frequency(value: f64) -> f64 {
    let scale = 10f64.powi(FREQUENCY_DECIMALS);
    (value * scale).round() / scale
}

/// A vector of relative frequencies over aligned categories or bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    pub frequencies: Vec<f64>,
}

impl Distribution {
    /// Relative frequencies from raw counts, rounded.
    ///
    /// Returns `None` when `total` is zero; an empty subset has no
    /// distribution.
    pub fn from_counts(counts: &[usize], total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let frequencies = counts
            .iter()
            .map(|&c| round_frequency(c as f64 / total as f64))
            .collect();
        Some(Self { frequencies })
    }

    /// Number of categories or bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Sum of all frequencies (1 up to rounding).
    pub fn total(&self) -> f64 {
        self.frequencies.iter().sum()
    }

    /// Euclidean distance to another distribution of the same shape.
    ///
    /// Slots missing from the shorter vector count as 0.
    pub fn euclidean(&self, other: &Distribution) -> f64 {
        let len = self.len().max(other.len());
        (0..len)
            .map(|i| {
                let a = self.frequencies.get(i).copied().unwrap_or(0.0);
                let b = other.frequencies.get(i).copied().unwrap_or(0.0);
                (a - b) * (a - b)
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// An outcome framing: how corpus rows map onto distribution slots.
///
/// Implementations are immutable after construction and shared across
/// scoring threads.
pub trait OutcomeFraming: Send + Sync {
    /// Which framing this is.
    fn kind(&self) -> FramingKind;

    /// Human-readable label of every slot, aligned with distributions.
    fn labels(&self) -> Vec<String>;

    /// Population distribution over the whole corpus.
    fn reference(&self) -> &Distribution;

    /// Distribution restricted to the given corpus rows, `None` if `rows` is
    /// empty.
    fn conditional(&self, rows: &[usize]) -> Option<Distribution>;
}

/// Counts slot occurrences for a set of rows.
fn count_slots(slot_of_row: &[usize], slots: usize, rows: &[usize]) -> Vec<usize> {
    let mut counts = vec![0usize; slots];
    for &row in rows {
        counts[slot_of_row[row]] += 1;
    }
    counts
}

// ============================================================================
// Categorical framing
// ============================================================================

/// Complexity-class mix.
#[derive(Debug, Clone)]
pub struct CategoricalFraming {
    class_of_row: Vec<usize>,
    reference: Distribution,
}

impl CategoricalFraming {
    pub fn new(corpus: &Corpus) -> SelectionResult<Self> {
        let class_of_row: Vec<usize> = corpus
            .complexities()
            .into_iter()
            .map(ComplexityClass::index)
            .collect();

        let all_rows: Vec<usize> = (0..class_of_row.len()).collect();
        let counts = count_slots(&class_of_row, ComplexityClass::ALL.len(), &all_rows);
        let reference = Distribution::from_counts(&counts, all_rows.len()).ok_or_else(|| {
            SelectionError::Corpus(CorpusError::Empty(
                "no records for categorical reference".to_string(),
            ))
        })?;

        Ok(Self {
            class_of_row,
            reference,
        })
    }
}

impl OutcomeFraming for CategoricalFraming {
    fn kind(&self) -> FramingKind {
        FramingKind::Categorical
    }

    fn labels(&self) -> Vec<String> {
        ComplexityClass::ALL.iter().map(|c| c.code().to_string()).collect()
    }

    fn reference(&self) -> &Distribution {
        &self.reference
    }

    fn conditional(&self, rows: &[usize]) -> Option<Distribution> {
        let counts = count_slots(&self.class_of_row, ComplexityClass::ALL.len(), rows);
        Distribution::from_counts(&counts, rows.len())
    }
}

// ============================================================================
// Histogram framing
// ============================================================================

/// Equal-width bin edges over an observed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// `bins + 1` evenly spaced edges from `min` to `max`.
    ///
    /// Fails with [`SelectionError::DegenerateOutcomeRange`] when the range
    /// has zero (or non-finite) width.
    pub fn linspace(min: f64, max: f64, bins: usize) -> SelectionResult<Self> {
        if !(max - min).is_finite() || max <= min {
            return Err(SelectionError::DegenerateOutcomeRange { min, max });
        }
        let bins = bins.max(1);
        let width = (max - min) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
        edges.push(max);
        Ok(Self { edges })
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// All boundary points.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin index of a value. Values outside the range clamp to the first or
    /// last bin.
    ///
    /// The arithmetic estimate is corrected against the stored edges, so a
    /// value equal to `edges()[i]` always lands in bin `i`.
    pub fn bin_of(&self, value: f64) -> usize {
        let min = self.edges[0];
        let max = self.edges[self.edges.len() - 1];
        let bins = self.bin_count();
        let position = (value - min) / (max - min) * bins as f64;
        let mut bin = if position <= 0.0 {
            0
        } else {
            (position.floor() as usize).min(bins - 1)
        };

        while bin > 0 && value < self.edges[bin] {
            bin -= 1;
        }
        while bin + 1 < bins && value >= self.edges[bin + 1] {
            bin += 1;
        }
        bin
    }
}

/// Histogram of log10 decision time.
#[derive(Debug, Clone)]
pub struct HistogramFraming {
    edges: BinEdges,
    bin_of_row: Vec<usize>,
    reference: Distribution,
}

impl HistogramFraming {
    /// Derives bin edges from the corpus range and bins every row.
    pub fn new(corpus: &Corpus, bins: usize) -> SelectionResult<Self> {
        let outcomes = corpus.outcomes();
        let min = outcomes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = outcomes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let edges = BinEdges::linspace(min, max, bins)?;

        let bin_of_row: Vec<usize> = outcomes.iter().map(|&v| edges.bin_of(v)).collect();
        let all_rows: Vec<usize> = (0..bin_of_row.len()).collect();
        let counts = count_slots(&bin_of_row, edges.bin_count(), &all_rows);
        let reference = Distribution::from_counts(&counts, all_rows.len()).ok_or_else(|| {
            SelectionError::Corpus(CorpusError::Empty(
                "no records for histogram reference".to_string(),
            ))
        })?;

        Ok(Self {
            edges,
            bin_of_row,
            reference,
        })
    }

    /// The bin edges shared by the reference and every conditional.
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }
}

impl OutcomeFraming for HistogramFraming {
    fn kind(&self) -> FramingKind {
        FramingKind::Continuous
    }

    fn labels(&self) -> Vec<String> {
        self.edges
            .edges()
            .windows(2)
            .map(|w| format!("[{:.4}, {:.4})", w[0], w[1]))
            .collect()
    }

    fn reference(&self) -> &Distribution {
        &self.reference
    }

    fn conditional(&self, rows: &[usize]) -> Option<Distribution> {
        let counts = count_slots(&self.bin_of_row, self.edges.bin_count(), rows);
        Distribution::from_counts(&counts, rows.len())
    }
}

/// Builds the framing of the given kind for a corpus.
pub fn build_framing(
    kind: FramingKind,
    corpus: &Corpus,
    histogram_bins: usize,
) -> SelectionResult<Box<dyn OutcomeFraming>> {
    Ok(match kind {
        FramingKind::Categorical => Box::new(CategoricalFraming::new(corpus)?),
        FramingKind::Continuous => Box::new(HistogramFraming::new(corpus, histogram_bins)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use featsel_core::Record;

    fn corpus(labels: &[(ComplexityClass, f64)]) -> Corpus {
        let records = labels
            .iter()
            .enumerate()
            .map(|(i, (c, v))| Record::new(format!("K{i}"), "device", *c, *v))
            .collect();
        Corpus::new(records).unwrap()
    }

    #[test]
    fn categorical_reference_three_records() {
        let corpus = corpus(&[
            (ComplexityClass::Low, 1.0),
            (ComplexityClass::Low, 2.0),
            (ComplexityClass::High, 3.0),
        ]);
        let framing = CategoricalFraming::new(&corpus).unwrap();

        // L, M, H
        assert_eq!(framing.reference().frequencies, vec![0.6667, 0.0, 0.3333]);
        assert_eq!(framing.labels(), vec!["L", "M", "H"]);
    }

    #[test]
    fn categorical_conditional_single_high_record() {
        let corpus = corpus(&[
            (ComplexityClass::Low, 1.0),
            (ComplexityClass::Low, 2.0),
            (ComplexityClass::High, 3.0),
        ]);
        let framing = CategoricalFraming::new(&corpus).unwrap();
        let conditional = framing.conditional(&[2]).unwrap();

        assert_eq!(conditional.frequencies, vec![0.0, 0.0, 1.0]);
        let distance = conditional.euclidean(framing.reference());
        assert!((distance - 0.9428).abs() < 1e-4);
    }

    #[test]
    fn conditional_of_no_rows_is_none() {
        let corpus = corpus(&[(ComplexityClass::Low, 1.0), (ComplexityClass::High, 2.0)]);
        let framing = CategoricalFraming::new(&corpus).unwrap();
        assert!(framing.conditional(&[]).is_none());
    }

    #[test]
    fn histogram_has_requested_bins_and_sums_to_one() {
        let values: Vec<(ComplexityClass, f64)> = (0..500)
            .map(|i| (ComplexityClass::Medium, 1.0 + (i as f64) * 0.003))
            .collect();
        let framing = HistogramFraming::new(&corpus(&values), DEFAULT_HISTOGRAM_BINS).unwrap();

        assert_eq!(framing.edges().edges().len(), 100);
        assert_eq!(framing.reference().len(), 99);
        assert!((framing.reference().total() - 1.0).abs() < 1e-3);
        assert_eq!(framing.labels().len(), 99);
    }

    #[test]
    fn histogram_extremes_land_in_first_and_last_bin() {
        let edges = BinEdges::linspace(0.0, 1.0, 4).unwrap();
        assert_eq!(edges.bin_of(0.0), 0);
        assert_eq!(edges.bin_of(0.25), 1);
        assert_eq!(edges.bin_of(0.9999), 3);
        assert_eq!(edges.bin_of(1.0), 3);
    }

    #[test]
    fn every_edge_maps_to_the_bin_it_opens() {
        for (min, max, bins) in [(0.0, 3.0, 99), (0.30103, 3.5611, 99), (-1.0, 7.3, 37)] {
            let edges = BinEdges::linspace(min, max, bins).unwrap();
            for (i, &edge) in edges.edges()[..bins].iter().enumerate() {
                assert_eq!(edges.bin_of(edge), i, "edge {i} of [{min}, {max}] value {edge}");
            }
            assert_eq!(edges.bin_of(max), bins - 1);
        }
    }

    #[test]
    fn histogram_degenerate_range_fails() {
        let corpus = corpus(&[(ComplexityClass::Low, 2.0), (ComplexityClass::High, 2.0)]);
        let err = HistogramFraming::new(&corpus, DEFAULT_HISTOGRAM_BINS).unwrap_err();
        assert!(matches!(err, SelectionError::DegenerateOutcomeRange { .. }));
    }

    #[test]
    fn histogram_conditional_uses_reference_edges() {
        let corpus = corpus(&[
            (ComplexityClass::Low, 0.0),
            (ComplexityClass::Low, 1.0),
            (ComplexityClass::Low, 2.0),
            (ComplexityClass::Low, 4.0),
        ]);
        let framing = HistogramFraming::new(&corpus, 4).unwrap();

        assert_eq!(framing.reference().frequencies, vec![0.25, 0.25, 0.25, 0.25]);
        let conditional = framing.conditional(&[2, 3]).unwrap();
        assert_eq!(conditional.frequencies, vec![0.0, 0.0, 0.5, 0.5]);
    }

    #[test]
    fn euclidean_of_identical_is_zero() {
        let d = Distribution {
            frequencies: vec![0.2, 0.3, 0.5],
        };
        assert_eq!(d.euclidean(&d), 0.0);
    }
}
