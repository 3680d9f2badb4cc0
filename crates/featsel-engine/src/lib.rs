//! featsel-engine: feature selection by distributional dissimilarity.
//!
//! Device names are tokenized into stemmed n-grams, candidates are
//! filtered by document frequency, and each candidate is scored by how far
//! the outcome distribution of the records containing it lies from the
//! corpus-wide distribution. A sweep over the filter strength picks the
//! operating point; the top features of each outcome framing are unioned.
//!
//! # Modules
//!
//! - [`tokenize`]: normalization, stemming and n-gram generation
//! - [`vocabulary`]: document frequencies and the prefix-stable ranking
//! - [`matrix`]: sparse record × feature incidence
//! - [`reference`]: categorical and histogram outcome framings
//! - [`distance`]: batched per-feature scoring
//! - [`sweep`]: grid sweep, operating point and final selection
//! - [`union`]: deterministic union of selections
//! - [`encode`]: binary token features for any record set
//! - [`pipeline`]: the whole run over one training corpus

pub mod distance;
pub mod encode;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod reference;
pub mod sweep;
pub mod tokenize;
pub mod union;
pub mod vocabulary;

pub use distance::{DistanceEngine, Exclusion, ExclusionReason, FeatureScore, ScoredFeatures};
pub use encode::{TokenEncoder, TokenEncoding};
pub use error::{Phase, PhaseContext, SelectionError, SelectionResult};
pub use matrix::IncidenceMatrix;
pub use pipeline::{FeatureSelectionPipeline, FramingOutcome, PipelineOutput};
pub use reference::{
    BinEdges, CategoricalFraming, Distribution, HistogramFraming, OutcomeFraming, build_framing,
};
pub use sweep::{
    Grid, OperatingPoint, SelectedFeature, SelectedFeatureSet, SweepOptimizer, SweepRecord,
    SweepReport,
};
pub use tokenize::{FeatureSet, Tokenizer};
pub use union::{union_features, union_tokens};
pub use vocabulary::{RankedToken, Vocabulary};

pub use featsel_core;
