//! featsel-core: shared types for device-name feature selection.
//!
//! This crate provides:
//! - Typed submission records and the fixed complexity-class alphabet
//! - The immutable training corpus snapshot every later phase consumes
//! - Labeling rules that turn raw submissions into analytical records
//! - Time-based train/validation/test partitioning
//! - Categorical dummy columns and id-keyed feature tables
//! - Pipeline configuration
//!
//! Nothing in here tokenizes or scores text; see `featsel-engine` for that.

pub mod config;
pub mod corpus;
pub mod error;
pub mod features;
pub mod labeling;
pub mod partition;
pub mod types;

pub use config::{ConfigError, FramingKind, PipelineConfig};
pub use corpus::{Corpus, CorpusFingerprint};
pub use error::{CorpusError, CorpusResult};
pub use features::{DummyCategories, FeatureTable};
pub use labeling::{AnalyticalRecord, LabelingRules, Submission};
pub use partition::{Partition, PartitionRules, YearRange};
pub use types::{ComplexityClass, Record, RecordId};
