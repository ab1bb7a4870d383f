//! Folder exclusion and file inclusion rules
//!
//! A folder is excluded when its name starts with a configured prefix or
//! when it contains the configured marker file. Files are picked up when
//! their name matches one of the include patterns and dropped again when
//! the name contains an excluded fragment or the size is over the limit.
//!
//! Include extensions are matched loosely: extension `jpg` becomes the
//! case-insensitive pattern `*.jpg*`, so `photo.jpg.bak` is picked up too
//! and later rejected by classification.

use std::collections::BTreeMap;

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

use albumsync_core::domain::SyncCounters;

use crate::engine::SyncOptions;
use crate::local::{LocalFile, LocalFolder};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Local files of one folder keyed by name
pub type SourceFiles = BTreeMap<String, LocalFile>;

/// Folder and file inclusion rules
#[derive(Debug, Clone)]
pub struct FolderFilter {
    exclude_prefixes: Vec<String>,
    exclude_marker: Option<String>,
    include_patterns: Vec<Pattern>,
    exclude_fragments: Vec<String>,
    max_size_bytes: u64,
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect()
}

impl FolderFilter {
    /// Builds the rules from run options. Blank list items are ignored.
    pub fn new(options: &SyncOptions) -> Self {
        let include_patterns = options
            .include_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .filter_map(|ext| {
                let pattern = format!("*.{}*", Pattern::escape(ext));
                match Pattern::new(&pattern) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        warn!(extension = ext, error = %e, "Ignoring include extension");
                        None
                    }
                }
            })
            .collect();

        Self {
            exclude_prefixes: non_blank(&options.exclude_folder_prefixes),
            exclude_marker: options
                .exclude_folder_marker
                .clone()
                .filter(|m| !m.trim().is_empty()),
            include_patterns,
            exclude_fragments: non_blank(&options.exclude_names_containing),
            max_size_bytes: options.max_size_bytes,
        }
    }

    /// Whether `folder` and its whole subtree are left out of the sync
    pub async fn should_exclude_folder(&self, folder: &LocalFolder) -> bool {
        if let Some(prefix) = self
            .exclude_prefixes
            .iter()
            .find(|p| folder.name().starts_with(p.as_str()))
        {
            debug!(folder = %folder.path().display(), prefix = %prefix, "Skipping folder (excluded by name)");
            return true;
        }

        if let Some(marker) = &self.exclude_marker {
            if folder.contains_file(marker).await {
                debug!(folder = %folder.path().display(), marker = %marker, "Skipping folder (exclude file found)");
                return true;
            }
        }

        false
    }

    /// Whether a file name matches any include pattern
    #[must_use]
    pub fn is_included_name(&self, name: &str) -> bool {
        self.include_patterns
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    /// Files of `folder` to synchronize, keyed by name.
    ///
    /// Every file dropped by a name fragment or the size limit bumps
    /// `files_skipped` once.
    pub async fn source_files(
        &self,
        folder: &LocalFolder,
        counters: &mut SyncCounters,
    ) -> std::io::Result<SourceFiles> {
        let mut files = SourceFiles::new();

        for file in folder.files().await? {
            if !self.is_included_name(&file.name) {
                continue;
            }

            if let Some(fragment) = self
                .exclude_fragments
                .iter()
                .find(|f| file.name.contains(f.as_str()))
            {
                debug!(file = %file.name, fragment = %fragment, "Excluding file (name filter)");
                counters.files_skipped += 1;
                continue;
            }

            if file.size > self.max_size_bytes {
                debug!(file = %file.name, size = file.size, limit = self.max_size_bytes, "Excluding file (too large)");
                counters.files_skipped += 1;
                continue;
            }

            files.insert(file.name.clone(), file);
        }

        Ok(files)
    }
}
