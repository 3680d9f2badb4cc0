//! PREPARE command - Build the analytical dataset from a raw dump.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use featsel_core::{ComplexityClass, PipelineConfig};
use featsel_store::{
    DUMMY_FEATURES_FILE, read_submissions, write_analytical, write_feature_table,
};
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the prepare command.
#[derive(Args)]
pub struct PrepareArgs {
    /// Pipe-delimited submission dump (ISO-8859-1)
    pub input: PathBuf,

    /// Analytical dataset to write
    #[arg(short, long, default_value = "analytical.csv")]
    pub output: PathBuf,

    /// Product-code and advisory-committee dummy table to write
    #[arg(short, long, default_value = DUMMY_FEATURES_FILE)]
    pub features: PathBuf,
}

/// Summary of a prepare run.
#[derive(Debug, Serialize)]
pub struct PrepareSummary {
    pub output: PathBuf,
    pub features: PathBuf,
    pub dummy_columns: usize,
    pub submissions: usize,
    pub retained: usize,
    pub classes: BTreeMap<String, usize>,
}

impl HumanReadable for PrepareSummary {
    fn print_human(&self) {
        println!("{}", "Analytical Dataset".green().bold());
        println!("{}", "=".repeat(60));
        println!();
        println!("  {} {}", "Output:".cyan(), self.output.display());
        println!(
            "  {} {} ({} columns)",
            "Dummy features:".cyan(),
            self.features.display(),
            self.dummy_columns
        );
        println!("  {} {}", "Submissions read:".cyan(), self.submissions);
        println!("  {} {}", "Retained:".cyan(), self.retained);
        println!();
        println!("{}", "Complexity classes:".yellow());
        for (class, count) in &self.classes {
            println!("  {} {}", format!("{class}:").bold(), count);
        }
    }
}

/// Execute the prepare command.
pub fn execute(config: &PipelineConfig, human: bool, args: PrepareArgs) -> Result<()> {
    let submissions = read_submissions(&args.input)
        .with_context(|| format!("reading submissions from {}", args.input.display()))?;
    let analytical = config.labeling.prepare(&submissions);

    write_analytical(&args.output, &analytical)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let dummies = config.dummies.table(&analytical);
    write_feature_table(&args.features, &config.columns.id, &dummies)
        .with_context(|| format!("writing {}", args.features.display()))?;

    let mut classes: BTreeMap<String, usize> = ComplexityClass::ALL
        .iter()
        .map(|c| (c.code().to_string(), 0))
        .collect();
    for record in &analytical {
        *classes.entry(record.complexity.code().to_string()).or_default() += 1;
    }

    let summary = PrepareSummary {
        output: args.output,
        features: args.features,
        dummy_columns: dummies.columns().len(),
        submissions: submissions.len(),
        retained: analytical.len(),
        classes,
    };
    output(&summary, human)
}
