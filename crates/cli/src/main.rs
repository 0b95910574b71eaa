//! # Session Sync CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - Simulated recording
//! - Library import, reconciliation, labels and playback alignment

mod cli;
mod commands;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use config_loader::ConfigLoader;
use contracts::ToolConfig;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{
    run_align, run_attach, run_import, run_info, run_list, run_reconcile, run_record, run_remove,
    run_validate,
};

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG: &str = "session-sync.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // validate-config reports load errors itself
    if let Commands::ValidateConfig(args) = &cli.command {
        init_logging(&cli, &ToolConfig::default())?;
        return run_validate(args, cli.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG)));
    }

    let config = load_config(&cli)?;
    init_logging(&cli, &config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Session Sync CLI starting"
    );

    let result = match &cli.command {
        Commands::Record(args) => run_record(args, &config).await,
        Commands::Import(args) => run_import(args, &config),
        Commands::List(args) => run_list(args, &config),
        Commands::Info(args) => run_info(args, &config),
        Commands::Reconcile(args) => run_reconcile(args, &config),
        Commands::Attach(args) => run_attach(args, &config),
        Commands::Align(args) => run_align(args, &config),
        Commands::Remove(args) => run_remove(args, &config),
        Commands::ValidateConfig(_) => Ok(()),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Explicit `--config`, else `session-sync.toml` if present, else defaults
fn load_config(cli: &Cli) -> Result<ToolConfig> {
    let path = match &cli.config {
        Some(path) => path.as_path(),
        None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
        None => return Ok(ToolConfig::default()),
    };

    ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Initialize logging from CLI flags layered over `[logging]`
fn init_logging(cli: &Cli, config: &ToolConfig) -> Result<()> {
    let mut observability = ObservabilityConfig::from_logging(&config.logging);

    if let Some(format) = cli.log_format {
        observability.log_format = format.into();
    }
    if cli.quiet {
        observability.default_log_level = "warn".to_string();
    } else if cli.verbose > 0 {
        observability.default_log_level = match cli.verbose {
            1 => "debug",
            _ => "trace",
        }
        .to_string();
    }

    observability::init_with_config(observability)
}
