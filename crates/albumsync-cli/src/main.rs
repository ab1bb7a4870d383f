//! albumsync CLI - Mirror local folders into remote photo albums
//!
//! Provides commands for:
//! - Synchronizing a folder tree into albums
//! - Viewing, validating and creating the configuration file
//! - Generating shell completions

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use albumsync_core::config::Config;

mod commands;
mod output;

use commands::{
    completions::CompletionsCommand, config::ConfigCommand, sync::SyncCommand, CommandContext,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "albumsync",
    version,
    about = "Synchronize local folders with a photo album service"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synchronize a folder (and optionally its subfolders) into albums
    Sync(SyncCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Loads the configuration the command will run with.
///
/// An explicit `--config` must exist. The default path falls back to
/// defaults when the file is absent. Parse errors are fatal except for the
/// `config` subcommands, which report them themselves.
fn load_config(cli: &Cli) -> Result<(PathBuf, Config)> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);

    if matches!(cli.command, Commands::Config(_)) {
        let config = Config::load_or_default(&path);
        return Ok((path, config));
    }

    if !path.exists() {
        if cli.config.is_some() {
            bail!("Configuration file not found: {}", path.display());
        }
        return Ok((path, Config::default()));
    }

    let config = Config::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok((path, config))
}

/// Default tracing filter when `RUST_LOG` is not set
fn log_filter(verbose: u8, quiet: bool, config: &Config) -> String {
    match verbose {
        0 if quiet => "warn".to_string(),
        0 if config.sync.verbose => "debug".to_string(),
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config_path, config) = load_config(&cli)?;

    // Setup tracing
    let filter = log_filter(cli.verbose, cli.quiet, &config);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let ctx = CommandContext {
        format,
        quiet: cli.quiet,
        config_path,
        config,
    };

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    }
}
