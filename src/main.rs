//! seshat CLI: temporal graph dataset preparation.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use seshat::encode::EncodedExample;
use seshat::prepare::{PrepareConfig, prepare};
use seshat::series::TimeSeries;
use seshat::split::SplitConfig;
use seshat::store;

#[derive(Parser)]
#[command(name = "seshat", version, about = "Temporal graph dataset preparation")]
struct Cli {
    /// Data directory containing the dataset and receiving the split files.
    #[arg(long, global = true, default_value = "data")]
    data_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a dataset and encode train/val into (prior graph, delta) examples.
    Prepare {
        /// Name of the dataset file in the data directory, without extension.
        #[arg(long)]
        dataset_name: String,

        /// Number of workers for delta computation and embedding.
        #[arg(long, default_value = "1")]
        num_workers: usize,

        /// Items dispatched to a worker at a time.
        #[arg(long, default_value = "20")]
        chunk_size: usize,

        /// Proportion of all series used for training; the rest become test.
        #[arg(long, default_value = "0.8")]
        train_p: f64,

        /// Proportion of the training slice carved off for validation.
        #[arg(long, default_value = "0.1")]
        val_p: f64,

        /// Shuffle series order before splitting.
        #[arg(long, default_value = "true", action = ArgAction::Set)]
        randomize: bool,

        /// Seed for the shuffle (reproducible splits).
        #[arg(long)]
        seed: Option<u64>,

        /// Record delta magnitudes only, dropping the +1/-1 signs.
        #[arg(long)]
        absolute: bool,

        /// Fail instead of reusing full slices when a split would be empty.
        #[arg(long)]
        strict_splits: bool,
    },

    /// Summarize a persisted raw or encoded split as JSON.
    Info {
        /// Path to a split file written by `prepare`.
        file: PathBuf,

        /// The file holds encoded examples rather than raw series.
        #[arg(long)]
        encoded: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            dataset_name,
            num_workers,
            chunk_size,
            train_p,
            val_p,
            randomize,
            seed,
            absolute,
            strict_splits,
        } => {
            let config = PrepareConfig {
                num_workers,
                chunk_size,
                signed: !absolute,
                split: SplitConfig {
                    train_p,
                    val_p,
                    randomize,
                    seed,
                    reuse_on_empty: !strict_splits,
                },
                ..PrepareConfig::new(cli.data_path, dataset_name)
            };

            let report = prepare(&config)?;
            println!("Training series:   {}", report.train_series);
            println!("Validation series: {}", report.val_series);
            println!("Test series:       {}", report.test_series);
            println!("Series length (T): {}", report.series_len);
            println!("Training examples:   {}", report.train_examples);
            println!("Validation examples: {}", report.val_examples);
        }

        Commands::Info { file, encoded } => {
            let summary = if encoded {
                let examples: Vec<EncodedExample> = store::load(&file)?;
                serde_json::json!({
                    "kind": "encoded",
                    "examples": examples.len(),
                    "num_nodes": examples.first().map(|e| e.graph.num_nodes()),
                    "feature_dim": examples.first().map(|e| e.graph.features().ncols()),
                    "total_changes": examples.iter().map(|e| e.delta.num_changes()).sum::<usize>(),
                })
            } else {
                let series: Vec<TimeSeries> = store::load(&file)?;
                let lengths: Vec<usize> = series.iter().map(TimeSeries::len).collect();
                serde_json::json!({
                    "kind": "raw",
                    "series": series.len(),
                    "num_nodes": series.first().map(TimeSeries::num_nodes),
                    "min_length": lengths.iter().min(),
                    "max_length": lengths.iter().max(),
                    "total_snapshots": lengths.iter().sum::<usize>(),
                })
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).into_diagnostic()?
            );
        }
    }

    Ok(())
}
