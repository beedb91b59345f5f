//! Command-line interface for validation-synth
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Default run: 100M weighted validations into validations.json
//! validation-synth generate --stop-times ./stop_times.txt
//!
//! # Small reproducible sample with a service date
//! validation-synth generate -i stop_times.txt -o sample.json \
//!   --count 10000 --seed 42 --validation-date 2025-06-22
//!
//! # Check the schedule and settings only
//! validation-synth generate -i stop_times.txt --dry-run
//! ```
//!
//! ## Inspect
//! ```bash
//! validation-synth inspect -i stop_times.txt --top 20
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use validation_populate_json::{GenerateArgs, InspectArgs};
use validation_synth::commands::{run_generate, run_inspect};

#[derive(Parser)]
#[command(name = "validation-synth")]
#[command(about = "Generate synthetic fare-validation events from a GTFS schedule")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream synthetic validations into a JSON array file
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Summarise a stop_times file without generating
    Inspect {
        #[command(flatten)]
        args: InspectArgs,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => {
            if let Some(metrics) = run_generate(&args)? {
                tracing::info!(
                    "Done: {} validations, {} bytes written to '{}'",
                    metrics.rows_written,
                    metrics.file_size_bytes,
                    args.output.display()
                );
            }
        }
        Commands::Inspect { args } => {
            let report = run_inspect(&args)?;
            print!("{report}");
        }
    }

    Ok(())
}
