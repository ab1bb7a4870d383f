//! Subcommands of the `albumsync` binary

pub mod completions;
pub mod config;
pub mod sync;

use std::path::PathBuf;

use albumsync_core::config::Config;

use crate::output::OutputFormat;

/// Global state shared by every subcommand
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub quiet: bool,
    /// Path the configuration was (or would be) loaded from
    pub config_path: PathBuf,
    /// Loaded configuration, defaults when the file does not exist
    pub config: Config,
}
