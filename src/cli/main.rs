mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Args;
use paisa_ledger::{LedgerEngine, MemoryStore};

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of info (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Initialize the LedgerEngine on an in-memory store
    let engine = LedgerEngine::new(MemoryStore::new());

    // 2. Open and process the input file
    log::info!("Processing operations from {}", args.input_file.display());
    let file = std::fs::File::open(&args.input_file)
        .with_context(|| format!("Failed to open input file: {}", args.input_file.display()))?;

    engine
        .process_ops(file)
        .context("Failed to process operations")?;

    log::info!(
        "Processing complete, exporting {} wallets",
        engine.wallet_count().context("Failed to count wallets")?
    );

    // 3. Export the wallets to stdout
    engine
        .export_wallets(std::io::stdout())
        .context("Failed to export wallets to stdout")?;

    log::info!("Export complete");

    Ok(())
}
