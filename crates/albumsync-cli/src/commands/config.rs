//! Config command - View and manage albumsync configuration
//!
//! Provides the `albumsync config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors
//! 4. Writes a default configuration file

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use albumsync_core::config::Config;
use albumsync_core::domain::AlbumAccess;

use super::CommandContext;
use crate::output::{get_formatter, OutputFormat};

const REDACTED: &str = "********";

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "photos.max_size")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value),
            ConfigCommand::Validate => self.execute_validate(ctx),
            ConfigCommand::Init { force } => self.execute_init(ctx, *force),
        }
    }

    /// Show current configuration with the access token masked
    fn execute_show(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = get_formatter(ctx.format, ctx.quiet);
        let config = redacted(&ctx.config);

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if matches!(ctx.format, OutputFormat::Json) {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    /// Set a configuration value using dot-notation
    fn execute_set(&self, ctx: &CommandContext, key: &str, value: &str) -> Result<()> {
        let formatter = get_formatter(ctx.format, ctx.quiet);
        let mut config = ctx.config.clone();

        info!(key = %key, "Setting configuration value");

        apply_config_value(&mut config, key, value)
            .with_context(|| format!("Failed to set '{}'", key))?;

        // Service fields may still be blank while the file is being filled in
        let errors: Vec<String> = config
            .validate()
            .iter()
            .filter(|e| !e.field.starts_with("service."))
            .map(|e| e.to_string())
            .collect();
        if !errors.is_empty() {
            bail!("Invalid value for '{}': {}", key, errors.join("; "));
        }

        save(&config, &ctx.config_path)?;

        if matches!(ctx.format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": ctx.config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {}", key));
            formatter.info(&format!("Saved to {}", ctx.config_path.display()));
        }
        Ok(())
    }

    /// Validate configuration file
    fn execute_validate(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = get_formatter(ctx.format, ctx.quiet);
        let config_path = &ctx.config_path;

        if !config_path.exists() {
            bail!(
                "Configuration file not found at {}. Run 'albumsync config init' to create one.",
                config_path.display()
            );
        }
        let config = Config::load(config_path)
            .with_context(|| format!("Failed to parse configuration {}", config_path.display()))?;

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if matches!(ctx.format, OutputFormat::Json) {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!("configuration is invalid")
        }
    }

    /// Write the default configuration
    fn execute_init(&self, ctx: &CommandContext, force: bool) -> Result<()> {
        let formatter = get_formatter(ctx.format, ctx.quiet);

        if ctx.config_path.exists() && !force {
            bail!(
                "{} already exists (use --force to overwrite)",
                ctx.config_path.display()
            );
        }

        save(&Config::default(), &ctx.config_path)?;
        info!(config_path = %ctx.config_path.display(), "Wrote default configuration");

        if matches!(ctx.format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "config_path": ctx.config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!(
                "Wrote default configuration to {}",
                ctx.config_path.display()
            ));
            formatter.info("Fill in service.base_url and service.account before syncing.");
        }
        Ok(())
    }
}

fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if config.service.access_token.is_some() {
        config.service.access_token = Some(REDACTED.to_string());
    }
    config
}

fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
    }
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    std::fs::write(path, yaml).context("Failed to write configuration file")?;
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse::<bool>()
        .with_context(|| format!("Expected true or false for {}", key))
}

/// Comma-separated list; blank items are dropped
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Empty string clears an optional value
fn parse_optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- service ---
        "service.base_url" => config.service.base_url = value.to_string(),
        "service.account" => config.service.account = value.to_string(),
        "service.access_token" => config.service.access_token = parse_optional(value),

        // --- files ---
        "files.include_extensions" => config.files.include_extensions = parse_list(value),
        "files.exclude_names_containing" => {
            config.files.exclude_names_containing = parse_list(value)
        }
        "files.max_size_bytes" => {
            config.files.max_size_bytes = value
                .parse::<u64>()
                .context("Expected a positive integer for files.max_size_bytes")?;
        }

        // --- folders ---
        "folders.exclude_name_prefixes" => {
            config.folders.exclude_name_prefixes = parse_list(value)
        }
        "folders.exclude_marker_file" => config.folders.exclude_marker_file = parse_optional(value),

        // --- album ---
        "album.name_format" => config.album.name_format = value.to_string(),
        "album.include_root_name" => config.album.include_root_name = parse_bool(key, value)?,
        "album.default_access" => {
            config.album.default_access = value.parse::<AlbumAccess>()?;
        }
        "album.private_folder_names" => config.album.private_folder_names = parse_list(value),
        "album.private_marker_file" => config.album.private_marker_file = parse_optional(value),
        "album.public_marker_file" => config.album.public_marker_file = parse_optional(value),

        // --- photos / videos ---
        "photos.resize" => config.photos.resize = parse_bool(key, value)?,
        "photos.max_size" => {
            config.photos.max_size = value
                .parse::<u32>()
                .context("Expected a positive integer for photos.max_size")?;
        }
        "videos.resize" => config.videos.resize = parse_bool(key, value)?,
        "videos.command" => config.videos.command = parse_optional(value),

        // --- sync ---
        "sync.recursive" => config.sync.recursive = parse_bool(key, value)?,
        "sync.clear_albums_first" => config.sync.clear_albums_first = parse_bool(key, value)?,
        "sync.add_only" => config.sync.add_only = parse_bool(key, value)?,
        "sync.verbose" => config.sync.verbose = parse_bool(key, value)?,

        // --- logging ---
        "logging.level" => config.logging.level = value.to_string(),

        _ => bail!("Unknown configuration key: {}", key),
    }
    Ok(())
}
