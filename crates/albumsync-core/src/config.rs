//! Configuration module for albumsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! Every section is optional in the file; missing keys take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::album::AlbumAccess;

/// Placeholder replaced by the folder name in `album.name_format`
pub const NAME_PLACEHOLDER: &str = "{0}";

/// Placeholder replaced by the source path in `videos.command`
pub const VIDEO_INPUT_PLACEHOLDER: &str = "{0}";

/// Placeholder replaced by the output path in `videos.command`
pub const VIDEO_OUTPUT_PLACEHOLDER: &str = "{1}";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for albumsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub files: FilesConfig,
    pub folders: FoldersConfig,
    pub album: AlbumConfig,
    pub photos: PhotosConfig,
    pub videos: VideosConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Remote album service connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the album API, without a trailing slash.
    pub base_url: String,
    /// Account whose albums are synchronized.
    pub account: String,
    /// Bearer token. `None` means "read `ALBUMSYNC_TOKEN` from the environment".
    pub access_token: Option<String>,
}

/// File inclusion rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Extensions to pick up, without the leading dot.
    pub include_extensions: Vec<String>,
    /// A file whose name contains any of these is skipped.
    pub exclude_names_containing: Vec<String>,
    /// Files larger than this many bytes are skipped.
    pub max_size_bytes: u64,
}

/// Folder exclusion rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    /// A folder whose name starts with any of these is excluded with its subtree.
    pub exclude_name_prefixes: Vec<String>,
    /// A folder containing a file with this name is excluded with its subtree.
    pub exclude_marker_file: Option<String>,
}

/// Album naming and access rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumConfig {
    /// Title template; `{0}` is replaced by the folder name.
    pub name_format: String,
    /// Keep the root folder's title as the first segment of child titles.
    pub include_root_name: bool,
    /// Access of the root folder when no marker applies.
    pub default_access: AlbumAccess,
    /// Folders with exactly one of these names are always private.
    pub private_folder_names: Vec<String>,
    /// A folder containing this file is private.
    pub private_marker_file: Option<String>,
    /// A folder containing this file is public.
    pub public_marker_file: Option<String>,
}

/// Photo resizing before upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosConfig {
    pub resize: bool,
    /// Maximum width and height in pixels.
    pub max_size: u32,
}

/// Video transformation before upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideosConfig {
    pub resize: bool,
    /// External command template; `{0}` is the input path, `{1}` the output path.
    pub command: Option<String>,
}

/// Run-mode switches. The CLI flags override these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Descend into subfolders.
    pub recursive: bool,
    /// Delete every entry of an album before uploading.
    pub clear_albums_first: bool,
    /// Never delete albums or entries.
    pub add_only: bool,
    /// Emit the per-folder and per-file trace lines.
    pub verbose: bool,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/albumsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("albumsync")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Extensions picked up when the config file does not list any.
const DEFAULT_INCLUDE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "gif", "tif", "tiff", "png", "bmp", "avi", "wmv", "mpg", "asf", "mov", "mp4",
];

/// 1 GiB
const DEFAULT_MAX_SIZE_BYTES: u64 = 1_073_741_824;

const DEFAULT_PHOTO_MAX_SIZE: u32 = 800;

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include_extensions: DEFAULT_INCLUDE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            exclude_names_containing: Vec::new(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            name_format: NAME_PLACEHOLDER.to_string(),
            include_root_name: false,
            default_access: AlbumAccess::Private,
            private_folder_names: Vec::new(),
            private_marker_file: None,
            public_marker_file: None,
        }
    }
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            resize: true,
            max_size: DEFAULT_PHOTO_MAX_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"photos.max_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- service ---
        if self.service.base_url.trim().is_empty() {
            errors.push(ValidationError {
                field: "service.base_url".into(),
                message: "must not be empty".into(),
            });
        }
        if self.service.account.trim().is_empty() {
            errors.push(ValidationError {
                field: "service.account".into(),
                message: "must not be empty".into(),
            });
        }

        // --- files ---
        if self
            .files
            .include_extensions
            .iter()
            .all(|e| e.trim().is_empty())
        {
            errors.push(ValidationError {
                field: "files.include_extensions".into(),
                message: "must list at least one extension".into(),
            });
        }
        if self.files.max_size_bytes == 0 {
            errors.push(ValidationError {
                field: "files.max_size_bytes".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- album ---
        if !self.album.name_format.contains(NAME_PLACEHOLDER) {
            errors.push(ValidationError {
                field: "album.name_format".into(),
                message: format!("must contain the folder name placeholder {NAME_PLACEHOLDER}"),
            });
        }

        // --- photos ---
        if self.photos.max_size == 0 {
            errors.push(ValidationError {
                field: "photos.max_size".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- videos ---
        if self.videos.resize {
            match self.videos.command.as_deref() {
                Some(cmd)
                    if cmd.contains(VIDEO_INPUT_PLACEHOLDER)
                        && cmd.contains(VIDEO_OUTPUT_PLACEHOLDER) => {}
                Some(_) => errors.push(ValidationError {
                    field: "videos.command".into(),
                    message: format!(
                        "must contain both {VIDEO_INPUT_PLACEHOLDER} (input) and {VIDEO_OUTPUT_PLACEHOLDER} (output)"
                    ),
                }),
                None => errors.push(ValidationError {
                    field: "videos.command".into(),
                    message: "required when videos.resize is enabled".into(),
                }),
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use albumsync_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .service("https://photos.example.com/api", "me")
///     .include_extensions(["jpg", "mp4"])
///     .recursive(true)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an existing configuration instead of the defaults.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    // --- service ---

    pub fn service(mut self, base_url: impl Into<String>, account: impl Into<String>) -> Self {
        self.config.service.base_url = base_url.into();
        self.config.service.account = account.into();
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.service.access_token = Some(token.into());
        self
    }

    // --- files ---

    pub fn include_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.files.include_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_names_containing<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.files.exclude_names_containing =
            fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.config.files.max_size_bytes = bytes;
        self
    }

    // --- folders ---

    pub fn exclude_name_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.folders.exclude_name_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_marker_file(mut self, name: impl Into<String>) -> Self {
        self.config.folders.exclude_marker_file = Some(name.into());
        self
    }

    // --- album ---

    pub fn name_format(mut self, format: impl Into<String>) -> Self {
        self.config.album.name_format = format.into();
        self
    }

    pub fn include_root_name(mut self, include: bool) -> Self {
        self.config.album.include_root_name = include;
        self
    }

    pub fn default_access(mut self, access: AlbumAccess) -> Self {
        self.config.album.default_access = access;
        self
    }

    pub fn private_folder_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.album.private_folder_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn private_marker_file(mut self, name: impl Into<String>) -> Self {
        self.config.album.private_marker_file = Some(name.into());
        self
    }

    pub fn public_marker_file(mut self, name: impl Into<String>) -> Self {
        self.config.album.public_marker_file = Some(name.into());
        self
    }

    // --- photos / videos ---

    pub fn resize_photos(mut self, resize: bool, max_size: u32) -> Self {
        self.config.photos.resize = resize;
        self.config.photos.max_size = max_size;
        self
    }

    pub fn resize_videos(mut self, command: impl Into<String>) -> Self {
        self.config.videos.resize = true;
        self.config.videos.command = Some(command.into());
        self
    }

    // --- sync ---

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.sync.recursive = recursive;
        self
    }

    pub fn clear_albums_first(mut self, clear: bool) -> Self {
        self.config.sync.clear_albums_first = clear;
        self
    }

    pub fn add_only(mut self, add_only: bool) -> Self {
        self.config.sync.add_only = add_only;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.sync.verbose = verbose;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
