//! Pipeline configuration.
//!
//! Loaded from a JSON file (`config.json`), every field optional with the
//! defaults below, then overridden from environment variables:
//!
//! - `FEATSEL_LOG_LEVEL`: logging level (default: "info")
//! - `FEATSEL_MIN_SUPPORT_PCT`: minimum median support, in percent

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

use crate::features::DummyCategories;
use crate::labeling::LabelingRules;
use crate::partition::PartitionRules;

/// Outcome framing a feature set is selected against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingKind {
    /// Relative frequencies of the L/M/H complexity classes.
    Categorical,
    /// Histogram over log10 decision time.
    Continuous,
}

impl FramingKind {
    /// Short name used in logs and artifact file names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categorical => "complexity",
            Self::Continuous => "decision_time",
        }
    }
}

impl fmt::Display for FramingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column names of the analytical dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub id: String,
    pub text: String,
    pub complexity: String,
    pub outcome: String,
    pub decision_date: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "KNUMBER".to_string(),
            text: "DEVICENAME".to_string(),
            complexity: "COMPLEXITY".to_string(),
            outcome: "DECISION_TIME_DAYS_LOG10".to_string(),
            decision_date: "DECISIONDATE".to_string(),
        }
    }
}

/// Complete configuration of a feature-selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Largest n-gram order generated by the tokenizer.
    pub max_ngram: usize,

    /// First K of the filter-strength grid.
    pub grid_start: usize,

    /// Last K of the filter-strength grid (inclusive).
    pub grid_end: usize,

    /// Number of evenly spaced grid points.
    pub grid_points: usize,

    /// Minimum median document frequency, as a percentage of the corpus,
    /// an operating point must keep.
    pub min_support_pct: f64,

    /// Features selected per framing at the operating point.
    pub top_n: usize,

    /// Incidence columns materialized at once while scoring.
    pub column_batch_size: usize,

    /// Number of histogram bins for the continuous framing.
    pub histogram_bins: usize,

    /// Framings to select against, in union priority order.
    pub framings: Vec<FramingKind>,

    pub columns: ColumnNames,
    pub labeling: LabelingRules,
    pub partition: PartitionRules,

    /// Product codes and advisory committees encoded as dummy columns.
    pub dummies: DummyCategories,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_ngram: 3,
            grid_start: 10,
            grid_end: 1000,
            grid_points: 100,
            min_support_pct: 0.5,
            top_n: 50,
            column_batch_size: 2048,
            histogram_bins: 99,
            framings: vec![FramingKind::Categorical, FramingKind::Continuous],
            columns: ColumnNames::default(),
            labeling: LabelingRules::default(),
            partition: PartitionRules::default(),
            dummies: DummyCategories::default(),
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Applies `FEATSEL_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FEATSEL_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(raw) = lookup("FEATSEL_MIN_SUPPORT_PCT") {
            self.min_support_pct = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "FEATSEL_MIN_SUPPORT_PCT".to_string(),
                reason: format!("not a number: {raw:?}"),
            })?;
        }

        self.validate()
    }

    /// Checks ranges and cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |name: &str, reason: &str| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if self.max_ngram == 0 {
            return Err(invalid("max_ngram", "must be at least 1"));
        }
        if self.grid_start == 0 {
            return Err(invalid("grid_start", "must be at least 1"));
        }
        if self.grid_end < self.grid_start {
            return Err(invalid("grid_end", "must not be below grid_start"));
        }
        if self.grid_points == 0 {
            return Err(invalid("grid_points", "must be at least 1"));
        }
        if !self.min_support_pct.is_finite() || !(0.0..=100.0).contains(&self.min_support_pct) {
            return Err(invalid("min_support_pct", "must be a percentage in [0, 100]"));
        }
        if self.top_n == 0 {
            return Err(invalid("top_n", "must be at least 1"));
        }
        if self.column_batch_size == 0 {
            return Err(invalid("column_batch_size", "must be at least 1"));
        }
        if self.histogram_bins == 0 {
            return Err(invalid("histogram_bins", "must be at least 1"));
        }
        if self.framings.is_empty() {
            return Err(invalid("framings", "at least one framing is required"));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// A value is out of range.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_reference_run() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_ngram, 3);
        assert_eq!((config.grid_start, config.grid_end, config.grid_points), (10, 1000, 100));
        assert_eq!(config.min_support_pct, 0.5);
        assert_eq!(config.top_n, 50);
        assert_eq!(config.histogram_bins, 99);
        assert_eq!(
            config.framings,
            vec![FramingKind::Categorical, FramingKind::Continuous]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(r#"{"top_n": 20, "columns": {"text": "NAME"}}"#)
            .unwrap();
        assert_eq!(config.top_n, 20);
        assert_eq!(config.columns.text, "NAME");
        assert_eq!(config.columns.id, "KNUMBER");
        assert_eq!(config.grid_points, 100);
    }

    #[test]
    fn dummy_categories_are_configurable() {
        let config =
            PipelineConfig::from_json_str(r#"{"dummies": {"product_codes": ["FRN"]}}"#).unwrap();
        assert_eq!(config.dummies.product_codes, vec!["FRN"]);
        assert_eq!(
            config.dummies.advisory_committees,
            DummyCategories::default().advisory_committees
        );
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            PipelineConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_grid() {
        let err = PipelineConfig::from_json_str(r#"{"grid_start": 100, "grid_end": 10}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "grid_end"));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("FEATSEL_LOG_LEVEL", "debug"),
            ("FEATSEL_MIN_SUPPORT_PCT", "1.5"),
        ]
        .into_iter()
        .collect();

        let mut config = PipelineConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.min_support_pct, 1.5);
    }

    #[test]
    fn env_override_rejects_garbage() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_overrides(|name| (name == "FEATSEL_MIN_SUPPORT_PCT").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn framing_names() {
        assert_eq!(FramingKind::Categorical.name(), "complexity");
        assert_eq!(FramingKind::Continuous.to_string(), "decision_time");
    }
}
