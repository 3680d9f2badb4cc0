//! Command implementations for the featsel CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod encode;
pub mod prepare;
pub mod select;
pub mod split;

use std::path::Path;

use anyhow::{Context, Result};
use featsel_core::PipelineConfig;
use serde::Serialize;

/// Loads the configuration file, or the defaults without one, then applies
/// environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config
        .apply_env()
        .context("applying environment overrides")?;
    Ok(config)
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}
