//! siplog: personal coffee consumption log.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod util;

use cli::{Cli, Commands};
use commands::AppContext;
use config::Config;
use siplog_store::StoreOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();
    let cli_data_dir = cli.data_dir.clone();
    let ctx = AppContext {
        data_dir: cli.data_dir.or_else(|| config.data_dir.clone()),
        debounce: config
            .debounce()
            .unwrap_or_else(|| StoreOptions::default().debounce),
        currency: config.currency.clone(),
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Drink(action) => commands::drink::run(action, &ctx),
        Commands::Grain(action) => commands::grain::run(action, &ctx),
        Commands::Config {
            currency,
            debounce_ms,
        } => commands::run_config(currency, cli_data_dir, debounce_ms),
    }
}
