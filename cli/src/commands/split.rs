//! SPLIT command - Write identifier lists per partition.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use featsel_core::PipelineConfig;
use featsel_store::{id_list_path, read_analytical, write_ids};
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Analytical dataset written by `prepare`
    #[arg(short, long, default_value = "analytical.csv")]
    pub data: PathBuf,

    /// Directory for the identifier lists
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Summary of a split run.
#[derive(Debug, Serialize)]
pub struct SplitSummary {
    pub records: usize,
    pub partitions: BTreeMap<String, PartitionSummary>,
}

#[derive(Debug, Serialize)]
pub struct PartitionSummary {
    pub path: PathBuf,
    pub records: usize,
}

impl HumanReadable for SplitSummary {
    fn print_human(&self) {
        println!("{}", "Partitions".green().bold());
        println!("{}", "=".repeat(60));
        println!();
        for (name, partition) in &self.partitions {
            println!(
                "  {} {} records -> {}",
                format!("{name:<10}").bold(),
                partition.records,
                partition.path.display().to_string().dimmed()
            );
        }
        println!();
        println!("  {} {}", "Total:".cyan(), self.records);
    }
}

/// Execute the split command.
pub fn execute(config: &PipelineConfig, human: bool, args: SplitArgs) -> Result<()> {
    let analytical = read_analytical(&args.data)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let split = config.partition.split(&analytical);

    let mut partitions = BTreeMap::new();
    for (partition, ids) in &split {
        let path = id_list_path(&args.out_dir, *partition, &config.columns.id);
        write_ids(&path, &config.columns.id, ids)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(partition = %partition, records = ids.len(), "wrote identifier list");
        partitions.insert(
            partition.name().to_string(),
            PartitionSummary {
                path,
                records: ids.len(),
            },
        );
    }

    let summary = SplitSummary {
        records: analytical.len(),
        partitions,
    };
    output(&summary, human)
}
