//! # VestClaw CLI — batch producer & checker
//!
//! Tooling around the vesting ledger: converts spreadsheet exports into
//! lock-request batch files and vets batch files before the authority
//! submits them. The ledger itself has no command surface; this binary
//! only drives `vestclaw-batch` and throwaway in-memory ledgers.
//!
//! Usage:
//!   vestclaw prepare -i data.csv -o ./output     # CSV → batch files
//!   vestclaw check -i output/addresses_size-500.0.json --genesis 1626652800

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vestclaw_core::VestClawConfig;
use vestclaw_ledger::Ledger;

#[derive(Parser)]
#[command(
    name = "vestclaw",
    version,
    about = "🔐 VestClaw — deferred token distribution tooling"
)]
struct Cli {
    /// Config file (default: ~/.vestclaw/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a CSV export (address,seconds,amount) into batch files
    Prepare {
        /// Input CSV path
        #[arg(short, long)]
        input: String,

        /// Output directory (default from config)
        #[arg(short, long)]
        out: Option<String>,

        /// Requests per batch file
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Base timestamp the per-row second offsets are added to
        #[arg(long)]
        base_timestamp: Option<u64>,

        /// Keep exact-duplicate rows instead of dropping them
        #[arg(long)]
        no_dedupe: bool,
    },

    /// Validate a batch file against the ledger's lock rules
    Check {
        /// Batch file path (addresses_size-*.json)
        #[arg(short, long)]
        input: String,

        /// Genesis floor for early-unlock validation (default from config)
        #[arg(long)]
        genesis: Option<u64>,
    },
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => VestClawConfig::load_from(Path::new(&expand_path(path)))?,
        None => VestClawConfig::load()?,
    };

    match cli.command {
        Command::Prepare {
            input,
            out,
            chunk_size,
            base_timestamp,
            no_dedupe,
        } => {
            let mut batch_cfg = config.batch.clone();
            if let Some(size) = chunk_size {
                batch_cfg.chunk_size = size;
            }
            if let Some(base) = base_timestamp {
                batch_cfg.base_timestamp = base;
            }
            if no_dedupe {
                batch_cfg.dedupe = false;
            }
            let out_dir = expand_path(out.as_deref().unwrap_or(&batch_cfg.output_dir));

            let csv_text = std::fs::read_to_string(expand_path(&input))?;
            let outcome =
                vestclaw_batch::prepare(&csv_text, Path::new(&out_dir), &batch_cfg)?;
            tracing::info!(
                "✅ {} row(s) → {} unique request(s) → {} file(s)",
                outcome.rows_parsed,
                outcome.unique_requests,
                outcome.files.len()
            );
        }

        Command::Check { input, genesis } => {
            let genesis = genesis.unwrap_or(config.ledger.genesis);
            let when = chrono::DateTime::from_timestamp(genesis as i64, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "?".into());
            tracing::info!("Checking against genesis {genesis} ({when})");

            let requests = vestclaw_batch::load_batch(Path::new(&expand_path(&input)))?;
            let violations = vestclaw_batch::check_batch(&requests, genesis);
            if !violations.is_empty() {
                for (index, err) in &violations {
                    tracing::error!("Request #{index}: {err}");
                }
                anyhow::bail!("batch failed validation: {} violation(s)", violations.len());
            }

            // Dry-run the whole batch through a throwaway ledger — proves
            // the submission would be accepted as a unit.
            let ledger = Ledger::new(genesis);
            ledger.lock_batch(&requests).await?;
            tracing::info!(
                "✅ {} request(s) valid, {} token(s) would be committed",
                requests.len(),
                ledger.total_committed().await
            );
        }
    }

    Ok(())
}
