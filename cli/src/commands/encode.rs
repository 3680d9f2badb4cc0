//! ENCODE command - Join binary token features onto the dummy table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use featsel_core::PipelineConfig;
use featsel_engine::{TokenEncoder, Tokenizer};
use featsel_store::{
    DUMMY_FEATURES_FILE, read_analytical, read_feature_table, read_token_dict,
    write_feature_table,
};
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// Analytical dataset written by `prepare`
    #[arg(short, long, default_value = "analytical.csv")]
    pub data: PathBuf,

    /// Exported feature list
    #[arg(short, long)]
    pub tokens: PathBuf,

    /// Dummy table written by `prepare`
    #[arg(short, long, default_value = DUMMY_FEATURES_FILE)]
    pub features: PathBuf,

    /// Merged table to write (default: update the dummy table in place)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Summary of an encode run.
#[derive(Debug, Serialize)]
pub struct EncodeSummary {
    pub output: PathBuf,
    pub records: usize,
    pub columns: usize,
    pub token_columns: usize,
    pub dropped: Vec<String>,
}

impl HumanReadable for EncodeSummary {
    fn print_human(&self) {
        println!("{}", "Token Features".green().bold());
        println!("{}", "=".repeat(60));
        println!();
        println!("  {} {}", "Output:".cyan(), self.output.display());
        println!("  {} {}", "Records:".cyan(), self.records);
        println!("  {} {}", "Columns:".cyan(), self.columns);
        println!("  {} {}", "Token columns:".cyan(), self.token_columns);
        if !self.dropped.is_empty() {
            println!(
                "  {} {}",
                "Dropped (no matches):".yellow(),
                self.dropped.join(", ").dimmed()
            );
        }
    }
}

/// Execute the encode command.
pub fn execute(config: &PipelineConfig, human: bool, args: EncodeArgs) -> Result<()> {
    let records = read_analytical(&args.data)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let tokens = read_token_dict(&args.tokens)
        .with_context(|| format!("reading {}", args.tokens.display()))?;

    let tokenizer = Tokenizer::new(config.max_ngram);
    let encoding = TokenEncoder::new(&tokenizer).encode(&records, &tokens);

    let dummies = read_feature_table(&args.features, &config.columns.id)
        .with_context(|| format!("reading {}", args.features.display()))?;
    let merged = dummies.merge(&encoding.to_table()?);

    let output_path = args.output.unwrap_or(args.features);
    write_feature_table(&output_path, &config.columns.id, &merged)
        .with_context(|| format!("writing {}", output_path.display()))?;

    let summary = EncodeSummary {
        output: output_path,
        records: merged.len(),
        columns: merged.columns().len(),
        token_columns: encoding.tokens().len(),
        dropped: encoding.dropped().to_vec(),
    };
    output(&summary, human)
}
