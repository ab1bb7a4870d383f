//! Sync command - Mirror a folder tree into remote albums
//!
//! Provides the `albumsync sync` CLI command which:
//! 1. Applies the command-line switches on top of the loaded configuration
//! 2. Resolves the access token (config file or `ALBUMSYNC_TOKEN`)
//! 3. Creates the HTTP album service and the SyncEngine
//! 4. Runs the engine and prints the run summary

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use albumsync_core::config::{Config, ConfigBuilder};
use albumsync_core::domain::SyncSummary;
use albumsync_http::provider::HttpAlbumService;
use albumsync_sync::{SyncEngine, SyncOptions};

use super::CommandContext;
use crate::output::{get_formatter, OutputFormat};

/// Environment variable consulted when the config has no access token
pub const TOKEN_ENV: &str = "ALBUMSYNC_TOKEN";

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Root folder to synchronize
    pub folder: PathBuf,

    /// Also synchronize every subfolder into its own album
    #[arg(short, long)]
    pub recursive: bool,

    /// Delete every entry of an album before uploading
    #[arg(long)]
    pub empty_album_first: bool,

    /// Only add albums and files; never delete anything remotely
    #[arg(long)]
    pub add_only: bool,
}

impl SyncCommand {
    /// Execute the sync command
    ///
    /// A fatal run error (authentication, album listing, missing root) is
    /// returned and ends the process with a non-zero status.
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = get_formatter(ctx.format, ctx.quiet);

        let config = self.effective_config(&ctx.config);
        let errors = config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!(
                "Invalid configuration ({}): {}",
                ctx.config_path.display(),
                messages.join("; ")
            );
        }

        let token = access_token(&config, std::env::var(TOKEN_ENV).ok())?;
        let service = Arc::new(HttpAlbumService::connect(
            config.service.base_url.clone(),
            token,
        ));
        let engine = SyncEngine::new(service, SyncOptions::from_config(&config));

        info!(
            folder = %self.folder.display(),
            account = %config.service.account,
            recursive = config.sync.recursive,
            "Starting synchronization"
        );
        formatter.info(&format!("Synchronizing {}", self.folder.display()));

        let summary = engine
            .run(&self.folder)
            .await
            .context("Synchronization aborted")?;

        if matches!(ctx.format, OutputFormat::Json) {
            formatter.print_json(&summary_json(&summary));
        } else {
            if summary.is_noop() {
                formatter.success("Already up to date");
            } else if summary.errors > 0 {
                formatter.warn(&format!(
                    "Sync completed with {} error{}",
                    summary.errors,
                    if summary.errors == 1 { "" } else { "s" }
                ));
            } else {
                formatter.success(&format!(
                    "Sync completed in {}",
                    format_elapsed(summary.elapsed)
                ));
            }
            for line in summary_lines(&summary) {
                formatter.info(&line);
            }
        }

        Ok(())
    }

    /// Configuration with the command-line switches applied
    fn effective_config(&self, base: &Config) -> Config {
        let mut builder = ConfigBuilder::from_config(base.clone());
        if self.recursive {
            builder = builder.recursive(true);
        }
        if self.empty_album_first {
            builder = builder.clear_albums_first(true);
        }
        if self.add_only {
            builder = builder.add_only(true);
        }
        builder.build()
    }
}

/// Token from the config file, else from the environment
fn access_token(config: &Config, from_env: Option<String>) -> Result<String> {
    match config
        .service
        .access_token
        .clone()
        .or(from_env)
        .filter(|t| !t.trim().is_empty())
    {
        Some(token) => Ok(token),
        None => bail!("No access token: set service.access_token or {TOKEN_ENV}"),
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms >= 1000 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", ms)
    }
}

/// Aligned human-readable summary, one counter per line
fn summary_lines(summary: &SyncSummary) -> Vec<String> {
    vec![
        format!("Folders skipped: {:>6}", summary.folders_skipped),
        format!("Albums created:  {:>6}", summary.albums_created),
        format!("Albums updated:  {:>6}", summary.albums_updated),
        format!("Albums deleted:  {:>6}", summary.albums_deleted),
        format!("Files uploaded:  {:>6}", summary.files_uploaded),
        format!("Files removed:   {:>6}", summary.files_removed),
        format!("Files skipped:   {:>6}", summary.files_skipped),
        format!("Errors:          {:>6}", summary.errors),
        format!("Elapsed time:    {:>6}", format_elapsed(summary.elapsed)),
    ]
}

fn summary_json(summary: &SyncSummary) -> serde_json::Value {
    serde_json::json!({
        "folders_skipped": summary.folders_skipped,
        "albums_created": summary.albums_created,
        "albums_updated": summary.albums_updated,
        "albums_deleted": summary.albums_deleted,
        "files_uploaded": summary.files_uploaded,
        "files_removed": summary.files_removed,
        "files_skipped": summary.files_skipped,
        "errors": summary.errors,
        "elapsed_ms": summary.elapsed.as_millis() as u64,
    })
}
