//! End-to-end selection over a training corpus.
//!
//! Tokenize → vocabulary → per framing: reference, sweep, operating point,
//! top-N → union of the framings' selections. Framings run in the order the
//! configuration lists them, which is also the union priority.

use featsel_core::{Corpus, CorpusFingerprint, PipelineConfig};
use serde::Serialize;
use tracing::info;

use crate::distance::DistanceEngine;
use crate::error::{Phase, PhaseContext, SelectionError, SelectionResult};
use crate::reference::build_framing;
use crate::sweep::{Grid, OperatingPoint, SelectedFeatureSet, SweepOptimizer, SweepReport};
use crate::tokenize::Tokenizer;
use crate::union::union_features;
use crate::vocabulary::Vocabulary;

/// Sweep and selection of one framing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramingOutcome {
    pub report: SweepReport,
    pub operating_point: OperatingPoint,
    pub selected: SelectedFeatureSet,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub fingerprint: CorpusFingerprint,
    pub outcomes: Vec<FramingOutcome>,
    /// Deduplicated union of all selections, framing order first.
    pub union: Vec<String>,
}

pub struct FeatureSelectionPipeline {
    config: PipelineConfig,
    tokenizer: Tokenizer,
}

impl FeatureSelectionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let tokenizer = Tokenizer::new(config.max_ngram);
        Self { config, tokenizer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn grid(&self) -> SelectionResult<Grid> {
        Grid::linspace(
            self.config.grid_start,
            self.config.grid_end,
            self.config.grid_points,
        )
    }

    pub fn run(&self, corpus: &Corpus) -> SelectionResult<PipelineOutput> {
        let grid = self.grid().during(Phase::Sweep)?;

        let names: Vec<&str> = corpus.device_names().collect();
        let documents = self.tokenizer.tokenize_all(&names);
        let vocabulary = Vocabulary::from_documents(&documents);
        info!(
            records = corpus.len(),
            tokens = vocabulary.len(),
            max_ngram = self.tokenizer.max_ngram(),
            "built vocabulary"
        );
        if vocabulary.is_empty() {
            return Err(SelectionError::EmptyVocabulary.during(Phase::Tokenize));
        }

        let mut outcomes = Vec::with_capacity(self.config.framings.len());
        for &kind in &self.config.framings {
            let framing = build_framing(kind, corpus, self.config.histogram_bins)
                .in_phase(Phase::Reference, kind)?;
            info!(framing = %kind, slots = framing.reference().len(), "computed reference distribution");

            let engine = DistanceEngine::new(&documents, &*framing)
                .with_batch_size(self.config.column_batch_size);
            let optimizer = SweepOptimizer::new(&vocabulary, engine, corpus.fingerprint().clone());

            let (report, scored) = optimizer.sweep(&grid).in_phase(Phase::Sweep, kind)?;
            let operating_point = report
                .operating_point(self.config.min_support_pct)
                .in_phase(Phase::Select, kind)?;
            info!(
                framing = %kind,
                k = operating_point.k,
                support_pct = operating_point.support_pct,
                "chose operating point"
            );

            let selected = optimizer
                .select(&scored, operating_point, self.config.top_n)
                .in_phase(Phase::Select, kind)?;
            info!(framing = %kind, features = selected.features.len(), "selected features");

            outcomes.push(FramingOutcome {
                report,
                operating_point,
                selected,
            });
        }

        let selections: Vec<SelectedFeatureSet> =
            outcomes.iter().map(|o| o.selected.clone()).collect();
        let union = union_features(&selections);
        info!(features = union.len(), "built feature union");

        Ok(PipelineOutput {
            fingerprint: corpus.fingerprint().clone(),
            outcomes,
            union,
        })
    }
}
