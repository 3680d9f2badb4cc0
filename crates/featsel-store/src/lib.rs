//! featsel-store: files in and out of the feature-selection pipeline
//!
//! This crate provides:
//! - Readers for the raw submission dump and the analytical dataset
//! - Identifier lists per partition
//! - Sweep and selection JSON artifacts, re-loadable and fingerprint-checked
//! - The exported feature list and id-keyed dummy feature tables
//!
//! Every write goes through [`write_artifact`], which renames a fully
//! written temporary file into place.
//!
//! # Usage
//!
//! ```rust,ignore
//! use featsel_store::{read_ids, read_records, write_token_dict};
//!
//! let records = read_records(&data_path, &config.columns)?;
//! let train_ids = read_ids(&train_path, "KNUMBER")?;
//! let corpus = Corpus::training(records, &train_ids)?;
//! ```

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod export;
pub mod ids;

pub use artifact::{
    read_json, read_selected, read_sweep_report, selected_path, sweep_path, write_artifact,
    write_json, write_selected, write_sweep_report,
};
pub use dataset::{
    ANALYTICAL_HEADER, read_analytical, read_records, read_submissions, write_analytical,
};
pub use error::{StoreError, StoreResult};
pub use export::{
    DUMMY_FEATURES_FILE, TOKENS_COLUMN, read_feature_table, read_token_dict, token_dict_name,
    write_feature_table, write_token_dict,
};
pub use ids::{id_list_path, read_ids, write_ids};

// Re-export the engine (and through it core) for downstream crates
pub use featsel_engine;
