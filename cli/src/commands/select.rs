//! SELECT command - Sweep, select and export features.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use featsel_core::{Corpus, FramingKind, Partition, PipelineConfig};
use featsel_engine::FeatureSelectionPipeline;
use featsel_store::{
    id_list_path, read_ids, read_records, selected_path, sweep_path, token_dict_name,
    write_selected, write_sweep_report, write_token_dict,
};
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the select command.
#[derive(Args)]
pub struct SelectArgs {
    /// Labeled dataset
    #[arg(short, long, default_value = "analytical.csv")]
    pub data: PathBuf,

    /// Training identifier list (default: train_<id column>.csv in --out-dir)
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Directory for sweep, selection and feature-list artifacts
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of features listed per framing in the summary
    #[arg(long, default_value_t = 10)]
    pub show: usize,
}

/// Summary of a select run.
#[derive(Debug, Serialize)]
pub struct SelectSummary {
    pub fingerprint: String,
    pub corpus_size: usize,
    pub framings: Vec<FramingSummary>,
    pub union_size: usize,
    pub token_dict: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FramingSummary {
    pub framing: FramingKind,
    pub k: usize,
    pub support_pct: f64,
    pub selected: usize,
    pub top: Vec<ScoredToken>,
    pub sweep: PathBuf,
    pub selection: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ScoredToken {
    pub token: String,
    pub distance: f64,
}

impl HumanReadable for SelectSummary {
    fn print_human(&self) {
        println!("{}", "Feature Selection".green().bold());
        println!("{}", "=".repeat(60));
        println!();
        println!("  {} {}", "Corpus:".cyan(), self.fingerprint.dimmed());
        println!("  {} {}", "Training records:".cyan(), self.corpus_size);
        println!();

        for framing in &self.framings {
            println!(
                "{} {}",
                ">>".blue().bold(),
                framing.framing.to_string().bold()
            );
            println!(
                "   {} K = {} ({:.3}% median support)",
                "Operating point:".cyan(),
                framing.k,
                framing.support_pct
            );
            println!("   {} {}", "Selected:".cyan(), framing.selected);
            for (rank, token) in framing.top.iter().enumerate() {
                println!(
                    "   {:>3}. {:<40} {:.4}",
                    rank + 1,
                    token.token,
                    token.distance
                );
            }
            println!();
        }

        println!(
            "  {} {} -> {}",
            "Union:".cyan(),
            self.union_size,
            self.token_dict.display()
        );
    }
}

/// Execute the select command.
pub fn execute(config: &PipelineConfig, human: bool, args: SelectArgs) -> Result<()> {
    let train_path = args
        .train
        .clone()
        .unwrap_or_else(|| id_list_path(&args.out_dir, Partition::Train, &config.columns.id));

    let records = read_records(&args.data, &config.columns)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let train_ids = read_ids(&train_path, &config.columns.id)
        .with_context(|| format!("reading {}", train_path.display()))?;
    let corpus = Corpus::training(records, &train_ids).context("building training corpus")?;
    tracing::info!(records = corpus.len(), fingerprint = %corpus.fingerprint(), "loaded training corpus");

    let pipeline = FeatureSelectionPipeline::new(config.clone());
    let result = pipeline.run(&corpus).context("feature selection failed")?;

    let mut framings = Vec::with_capacity(result.outcomes.len());
    for outcome in &result.outcomes {
        let framing = outcome.selected.framing;
        let sweep = sweep_path(&args.out_dir, framing);
        let selection = selected_path(&args.out_dir, framing);

        write_sweep_report(&sweep, &outcome.report)
            .with_context(|| format!("writing {}", sweep.display()))?;
        write_selected(&selection, &outcome.selected)
            .with_context(|| format!("writing {}", selection.display()))?;

        framings.push(FramingSummary {
            framing,
            k: outcome.operating_point.k,
            support_pct: outcome.operating_point.support_pct,
            selected: outcome.selected.features.len(),
            top: outcome
                .selected
                .features
                .iter()
                .take(args.show)
                .map(|f| ScoredToken {
                    token: f.token.clone(),
                    distance: f.distance,
                })
                .collect(),
            sweep,
            selection,
        });
    }

    let token_dict = args.out_dir.join(token_dict_name(&config.columns.text));
    write_token_dict(&token_dict, &result.union)
        .with_context(|| format!("writing {}", token_dict.display()))?;

    let summary = SelectSummary {
        fingerprint: corpus.fingerprint().to_string(),
        corpus_size: corpus.len(),
        framings,
        union_size: result.union.len(),
        token_dict,
    };
    output(&summary, human)
}
