//! Command-line driver for device-name feature selection.
//!
//! Subcommands follow the batch pipeline:
//! - prepare: label and filter the raw submission dump
//! - split: write train/validation/test identifier lists
//! - select: sweep, select and export features from the training corpus
//! - encode: apply an exported feature list to any records
//!
//! Configuration comes from a JSON file (`--config`), with `FEATSEL_LOG_LEVEL`
//! and `FEATSEL_MIN_SUPPORT_PCT` overriding it. Logs go to stderr; `RUST_LOG`
//! takes precedence over the configured level.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{
    encode::EncodeArgs, prepare::PrepareArgs, select::SelectArgs, split::SplitArgs,
};

/// Device-name feature selection
///
/// Summaries are printed as JSON on stdout unless --human is given.
#[derive(Parser)]
#[command(name = "featsel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Pipeline configuration file
    #[arg(long, env = "FEATSEL_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label and filter a raw submission dump into the analytical dataset
    Prepare(PrepareArgs),

    /// Partition the analytical dataset by decision year
    Split(SplitArgs),

    /// Select features on the training partition and export them
    Select(SelectArgs),

    /// Encode records against an exported feature list
    Encode(EncodeArgs),
}

fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level, cli.json);

    let result = match cli.command {
        Commands::Prepare(args) => commands::prepare::execute(&config, cli.human, args),
        Commands::Split(args) => commands::split::execute(&config, cli.human, args),
        Commands::Select(args) => commands::select::execute(&config, cli.human, args),
        Commands::Encode(args) => commands::encode::execute(&config, cli.human, args),
    };

    if let Err(e) = result {
        tracing::error!(error = %format!("{:#}", e), "command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
