//! Per-feature conditional distributions and their distance from the
//! reference.
//!
//! ## Algorithm
//!
//! 1. Split the candidate list into column batches of `batch_size`
//! 2. Materialize the incidence matrix for one batch only
//! 3. For every column, in parallel: rows with incidence 1 → conditional
//!    distribution → Euclidean distance to the reference
//! 4. Reassemble results in candidate order
//!
//! Features present in no record, and features whose distance is not a
//! finite number, are excluded and reported rather than scored. Peak memory
//! is bounded by the batch size, not the candidate count.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matrix::IncidenceMatrix;
use crate::reference::{Distribution, OutcomeFraming};
use crate::tokenize::FeatureSet;
use crate::vocabulary::RankedToken;

/// Default number of incidence columns materialized at once.
pub const DEFAULT_COLUMN_BATCH_SIZE: usize = 2048;

/// A scored candidate feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub token: String,

    /// Position in the candidate list (the document-frequency ranking).
    pub rank: usize,

    pub document_frequency: usize,

    /// Euclidean distance of the conditional distribution from the
    /// reference.
    pub distance: f64,

    pub distribution: Distribution,
}

/// Why a candidate was not scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The feature occurs in no corpus record.
    ZeroIncidence,
    /// The distance came out NaN or infinite.
    NonFiniteDistance,
}

/// A candidate left out of scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub token: String,
    pub rank: usize,
    pub reason: ExclusionReason,
}

/// Result of scoring a candidate list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredFeatures {
    /// Scored features in candidate order.
    pub scores: Vec<FeatureScore>,

    /// Excluded candidates in candidate order.
    pub exclusions: Vec<Exclusion>,
}

impl ScoredFeatures {
    /// Scores among the first `candidates` candidates.
    pub fn within(&self, candidates: usize) -> &[FeatureScore] {
        let end = self.scores.partition_point(|s| s.rank < candidates);
        &self.scores[..end]
    }

    /// The `n` most distant scored features, ties kept in candidate order.
    pub fn top_n(&self, n: usize) -> Vec<FeatureScore> {
        top_n(&self.scores, n)
    }
}

/// The `n` most distant features of `scores`.
///
/// The sort is stable, so equal distances keep their incoming (rank) order.
pub fn top_n(scores: &[FeatureScore], n: usize) -> Vec<FeatureScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    ranked.truncate(n);
    ranked
}

enum Outcome {
    Scored(FeatureScore),
    Excluded(Exclusion),
}

/// Scores candidate features against one outcome framing.
pub struct DistanceEngine<'a> {
    documents: &'a [FeatureSet],
    framing: &'a dyn OutcomeFraming,
    batch_size: usize,
}

impl<'a> DistanceEngine<'a> {
    pub fn new(documents: &'a [FeatureSet], framing: &'a dyn OutcomeFraming) -> Self {
        Self {
            documents,
            framing,
            batch_size: DEFAULT_COLUMN_BATCH_SIZE,
        }
    }

    /// Sets the number of columns materialized per batch (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn framing(&self) -> &dyn OutcomeFraming {
        self.framing
    }

    /// Scores every candidate. `rank` of each result is its index in
    /// `candidates`.
    pub fn score(&self, candidates: &[RankedToken]) -> ScoredFeatures {
        let mut result = ScoredFeatures::default();

        for (batch_index, batch) in candidates.chunks(self.batch_size).enumerate() {
            let offset = batch_index * self.batch_size;
            let names: Vec<&str> = batch.iter().map(|c| c.token.as_str()).collect();
            let matrix = IncidenceMatrix::build(self.documents, &names);

            let outcomes: Vec<Outcome> = (0..matrix.column_count())
                .into_par_iter()
                .map(|col| self.score_column(&matrix, col, offset + col))
                .collect();

            debug!(
                framing = %self.framing.kind(),
                batch = batch_index,
                columns = batch.len(),
                "scored column batch"
            );

            for outcome in outcomes {
                match outcome {
                    Outcome::Scored(score) => result.scores.push(score),
                    Outcome::Excluded(exclusion) => {
                        if exclusion.reason == ExclusionReason::NonFiniteDistance {
                            warn!(
                                framing = %self.framing.kind(),
                                token = %exclusion.token,
                                "excluding feature with non-finite distance"
                            );
                        }
                        result.exclusions.push(exclusion);
                    }
                }
            }
        }

        result
    }

    fn score_column(&self, matrix: &IncidenceMatrix, col: usize, rank: usize) -> Outcome {
        let token = matrix.columns()[col].clone();
        let rows = matrix.column_rows(col);

        let Some(distribution) = self.framing.conditional(rows) else {
            return Outcome::Excluded(Exclusion {
                token,
                rank,
                reason: ExclusionReason::ZeroIncidence,
            });
        };

        let distance = distribution.euclidean(self.framing.reference());
        if !distance.is_finite() {
            return Outcome::Excluded(Exclusion {
                token,
                rank,
                reason: ExclusionReason::NonFiniteDistance,
            });
        }

        Outcome::Scored(FeatureScore {
            token,
            rank,
            document_frequency: rows.len(),
            distance,
            distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::CategoricalFraming;
    use featsel_core::{ComplexityClass, Corpus, FramingKind, Record};

    /// Produces a NaN slot whenever row 2 is among the conditioned rows.
    struct UnstableFraming {
        reference: Distribution,
    }

    impl OutcomeFraming for UnstableFraming {
        fn kind(&self) -> FramingKind {
            FramingKind::Continuous
        }

        fn labels(&self) -> Vec<String> {
            vec!["a".to_string(), "b".to_string()]
        }

        fn reference(&self) -> &Distribution {
            &self.reference
        }

        fn conditional(&self, rows: &[usize]) -> Option<Distribution> {
            if rows.is_empty() {
                return None;
            }
            let first = if rows.contains(&2) { f64::NAN } else { 1.0 };
            Some(Distribution {
                frequencies: vec![first, 0.0],
            })
        }
    }

    fn fixture() -> (Corpus, Vec<FeatureSet>) {
        let records = vec![
            Record::new("K1", "a", ComplexityClass::Low, 1.0),
            Record::new("K2", "b", ComplexityClass::Low, 1.5),
            Record::new("K3", "c", ComplexityClass::High, 2.5),
        ];
        let documents: Vec<FeatureSet> = [vec!["shared", "low"], vec!["shared", "low"], vec!["shared", "high"]]
            .iter()
            .map(|d| d.iter().map(|s| s.to_string()).collect())
            .collect();
        (Corpus::new(records).unwrap(), documents)
    }

    fn candidates(tokens: &[(&str, usize)]) -> Vec<RankedToken> {
        tokens
            .iter()
            .map(|(t, df)| RankedToken {
                token: t.to_string(),
                document_frequency: *df,
            })
            .collect()
    }

    #[test]
    fn scores_against_reference() {
        let (corpus, documents) = fixture();
        let framing = CategoricalFraming::new(&corpus).unwrap();
        let engine = DistanceEngine::new(&documents, &framing);

        let scored = engine.score(&candidates(&[("shared", 3), ("low", 2), ("high", 1)]));
        assert!(scored.exclusions.is_empty());

        let by_token = |t: &str| scored.scores.iter().find(|s| s.token == t).unwrap();
        assert_eq!(by_token("shared").distance, 0.0);
        assert!((by_token("high").distance - 0.9428).abs() < 1e-4);
        assert_eq!(by_token("low").distribution.frequencies, vec![1.0, 0.0, 0.0]);
        assert_eq!(by_token("low").document_frequency, 2);
    }

    #[test]
    fn zero_incidence_features_are_excluded() {
        let (corpus, documents) = fixture();
        let framing = CategoricalFraming::new(&corpus).unwrap();
        let engine = DistanceEngine::new(&documents, &framing);

        let scored = engine.score(&candidates(&[("shared", 3), ("absent", 0)]));
        assert_eq!(scored.scores.len(), 1);
        assert_eq!(scored.exclusions.len(), 1);
        assert_eq!(scored.exclusions[0].token, "absent");
        assert_eq!(scored.exclusions[0].reason, ExclusionReason::ZeroIncidence);
        assert!(scored.top_n(10).iter().all(|s| s.token != "absent"));
    }

    #[test]
    fn non_finite_distances_are_excluded() {
        let (_, documents) = fixture();
        let framing = UnstableFraming {
            reference: Distribution {
                frequencies: vec![0.5, 0.5],
            },
        };
        let engine = DistanceEngine::new(&documents, &framing);

        let scored = engine.score(&candidates(&[("shared", 3), ("low", 2), ("high", 1)]));
        assert_eq!(scored.scores.len(), 1);
        assert_eq!(scored.scores[0].token, "low");
        assert_eq!(
            scored.exclusions,
            vec![
                Exclusion {
                    token: "shared".to_string(),
                    rank: 0,
                    reason: ExclusionReason::NonFiniteDistance,
                },
                Exclusion {
                    token: "high".to_string(),
                    rank: 2,
                    reason: ExclusionReason::NonFiniteDistance,
                },
            ]
        );
        assert!(scored.top_n(3).iter().all(|s| s.distance.is_finite()));
    }

    #[test]
    fn batching_does_not_change_results() {
        let (corpus, documents) = fixture();
        let framing = CategoricalFraming::new(&corpus).unwrap();
        let list = candidates(&[("shared", 3), ("low", 2), ("high", 1), ("absent", 0)]);

        let whole = DistanceEngine::new(&documents, &framing).score(&list);
        let batched = DistanceEngine::new(&documents, &framing)
            .with_batch_size(1)
            .score(&list);
        assert_eq!(whole, batched);
    }

    #[test]
    fn top_n_breaks_ties_by_rank() {
        let score = |token: &str, rank: usize, distance: f64| FeatureScore {
            token: token.to_string(),
            rank,
            document_frequency: 1,
            distance,
            distribution: Distribution {
                frequencies: vec![],
            },
        };
        let scores = vec![
            score("a", 0, 0.1),
            score("b", 1, 0.5),
            score("c", 2, 0.5),
            score("d", 3, 0.9),
        ];

        let top: Vec<String> = top_n(&scores, 3).into_iter().map(|s| s.token).collect();
        assert_eq!(top, vec!["d", "b", "c"]);
    }

    #[test]
    fn within_limits_to_candidate_prefix() {
        let (corpus, documents) = fixture();
        let framing = CategoricalFraming::new(&corpus).unwrap();
        let engine = DistanceEngine::new(&documents, &framing);
        let scored = engine.score(&candidates(&[("shared", 3), ("absent", 0), ("high", 1)]));

        assert_eq!(scored.within(1).len(), 1);
        assert_eq!(scored.within(2).len(), 1);
        assert_eq!(scored.within(3).len(), 2);
    }
}
