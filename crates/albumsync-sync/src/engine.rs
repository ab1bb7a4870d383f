//! Folder-to-album synchronization engine
//!
//! The [`SyncEngine`] walks a local folder tree and reconciles each folder
//! with the remote album carrying the same computed title.
//!
//! ## Sync Flow
//!
//! 1. **Listing**: fetch every album of the account once, before the walk
//! 2. **Walk**: visit folders in pre-order, children by ascending creation time
//! 3. **Per folder**: exclude (and delete its album), or create/update the
//!    album, delete stale entries, then upload missing files oldest first
//! 4. **Summary**: freeze the run counters
//!
//! Only an authentication failure or a failed initial listing aborts a run.
//! Every other failure is logged, counted and the walk moves on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use albumsync_core::config::{Config, NAME_PLACEHOLDER};
use albumsync_core::domain::{
    find_album_by_title, AlbumAccess, EntryListing, MediaType, RemoteAlbum, RemoteEntry,
    SyncCounters, SyncSummary,
};
use albumsync_core::ports::IAlbumService;

use crate::access::AccessResolver;
use crate::filter::{FolderFilter, SourceFiles};
use crate::local::{LocalFile, LocalFolder};
use crate::transform::image as photo;
use crate::transform::video::{self, VideoCommand};
use crate::SyncError;

// ============================================================================
// SyncOptions
// ============================================================================

/// Everything a run needs to know besides the folder and the service
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Account whose albums are synchronized
    pub account: String,
    pub include_extensions: Vec<String>,
    pub exclude_names_containing: Vec<String>,
    pub max_size_bytes: u64,
    pub exclude_folder_prefixes: Vec<String>,
    pub exclude_folder_marker: Option<String>,
    /// Descend into subfolders
    pub recursive: bool,
    pub resize_photos: bool,
    /// Bounding box (both sides) for resized photos
    pub photo_max_size: u32,
    pub resize_videos: bool,
    pub video_command: Option<String>,
    /// Delete every entry of an album before uploading
    pub clear_albums_first: bool,
    /// Never delete albums or entries
    pub add_only: bool,
    /// Title template, `{0}` is the folder name
    pub album_name_format: String,
    /// Keep the root folder title in child album titles
    pub include_root_name: bool,
    pub default_access: AlbumAccess,
    pub private_folder_names: Vec<String>,
    pub private_marker_file: Option<String>,
    pub public_marker_file: Option<String>,
}

impl SyncOptions {
    /// Takes every engine setting from `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            account: config.service.account.clone(),
            include_extensions: config.files.include_extensions.clone(),
            exclude_names_containing: config.files.exclude_names_containing.clone(),
            max_size_bytes: config.files.max_size_bytes,
            exclude_folder_prefixes: config.folders.exclude_name_prefixes.clone(),
            exclude_folder_marker: config.folders.exclude_marker_file.clone(),
            recursive: config.sync.recursive,
            resize_photos: config.photos.resize,
            photo_max_size: config.photos.max_size,
            resize_videos: config.videos.resize,
            video_command: config.videos.command.clone(),
            clear_albums_first: config.sync.clear_albums_first,
            add_only: config.sync.add_only,
            album_name_format: config.album.name_format.clone(),
            include_root_name: config.album.include_root_name,
            default_access: config.album.default_access,
            private_folder_names: config.album.private_folder_names.clone(),
            private_marker_file: config.album.private_marker_file.clone(),
            public_marker_file: config.album.public_marker_file.clone(),
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Computes the album title of a folder.
///
/// The formatted folder name is prefixed with `"<prefix> - "` unless there is
/// no prefix, or the prefix is the root folder name and `include_root_name`
/// is off.
pub fn album_title(
    name_format: &str,
    folder_name: &str,
    prefix: Option<&str>,
    root_name: &str,
    include_root_name: bool,
) -> String {
    let title = name_format.replace(NAME_PLACEHOLDER, folder_name);
    match prefix {
        Some(prefix) if !prefix.is_empty() && (include_root_name || prefix != root_name) => {
            format!("{prefix} - {title}")
        }
        _ => title,
    }
}

// ============================================================================
// Per-folder bookkeeping
// ============================================================================

/// Terminal state of one visited folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderState {
    /// Excluded by name or marker; the subtree is pruned
    Excluded,
    /// Nothing to upload; no album is touched
    Empty,
    Synced,
    /// A folder-level step failed; children are still visited
    SyncFailed,
}

/// A folder waiting on the walk stack
struct PendingFolder {
    folder: LocalFolder,
    prefix: Option<String>,
    inherited: AlbumAccess,
}

/// What a visited folder hands down to its children
struct VisitedFolder {
    state: FolderState,
    title: String,
    access: AlbumAccess,
}

// ============================================================================
// SyncEngine
// ============================================================================

/// One-way synchronization engine from a local tree to remote albums
///
/// ## Dependencies
///
/// - `service`: remote album operations (list, create, update, delete, upload)
/// - `options`: filters, access rules, transforms and run-mode switches
pub struct SyncEngine {
    service: Arc<dyn IAlbumService>,
    options: SyncOptions,
    filter: FolderFilter,
    access: AccessResolver,
    video_command: Option<VideoCommand>,
}

impl SyncEngine {
    pub fn new(service: Arc<dyn IAlbumService>, options: SyncOptions) -> Self {
        let video_command = if options.resize_videos {
            options
                .video_command
                .as_deref()
                .and_then(|template| match VideoCommand::parse(template) {
                    Ok(cmd) => Some(cmd),
                    Err(e) => {
                        warn!(error = %e, "Video transform disabled");
                        None
                    }
                })
        } else {
            None
        };

        Self {
            filter: FolderFilter::new(&options),
            access: AccessResolver::new(&options),
            service,
            options,
            video_command,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Synchronizes `root` and everything below it (when recursive).
    ///
    /// # Errors
    /// - [`SyncError::RootNotFound`] if `root` is not a readable directory
    /// - [`SyncError::Authentication`] if the service rejects the credentials
    /// - [`SyncError::Remote`] if the album listing cannot be fetched
    #[tracing::instrument(skip(self, root), fields(root = %root.display()))]
    pub async fn run(&self, root: &Path) -> Result<SyncSummary, SyncError> {
        let mut counters = SyncCounters::start();

        let root_folder = open_root(root).await?;

        info!(account = %self.options.account, "Connecting to album service");
        let albums = self.service.list_albums(&self.options.account).await?;
        info!(albums = albums.len(), "Starting sync");

        let root_name = root_folder.name().to_string();
        let mut pending = vec![PendingFolder {
            folder: root_folder,
            prefix: None,
            inherited: self.options.default_access,
        }];

        while let Some(next) = pending.pop() {
            let visited = self
                .sync_folder(&next, &root_name, &albums, &mut counters)
                .await;

            if visited.state == FolderState::Excluded || !self.options.recursive {
                continue;
            }

            match next.folder.subfolders().await {
                Ok(children) => {
                    // reversed so the first child is popped first
                    for child in children.into_iter().rev() {
                        pending.push(PendingFolder {
                            folder: child,
                            prefix: Some(visited.title.clone()),
                            inherited: visited.access,
                        });
                    }
                }
                Err(e) => {
                    warn!(folder = %next.folder.path().display(), error = %e, "Cannot list subfolders");
                    counters.errors += 1;
                }
            }
        }

        let summary = counters.finish();
        info!(
            folders_skipped = summary.folders_skipped,
            albums_created = summary.albums_created,
            albums_updated = summary.albums_updated,
            albums_deleted = summary.albums_deleted,
            files_uploaded = summary.files_uploaded,
            files_removed = summary.files_removed,
            files_skipped = summary.files_skipped,
            errors = summary.errors,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Sync complete"
        );
        Ok(summary)
    }

    // ========================================================================
    // Folder level
    // ========================================================================

    async fn sync_folder(
        &self,
        pending: &PendingFolder,
        root_name: &str,
        albums: &[RemoteAlbum],
        counters: &mut SyncCounters,
    ) -> VisitedFolder {
        let folder = &pending.folder;
        let title = album_title(
            &self.options.album_name_format,
            folder.name(),
            pending.prefix.as_deref(),
            root_name,
            self.options.include_root_name,
        );

        let files = self.filter.source_files(folder, counters).await;
        let excluded = self.filter.should_exclude_folder(folder).await;
        let existing = find_album_by_title(albums, &title);

        if excluded {
            match existing {
                Some(album) if !self.options.add_only => {
                    info!(album = %title, "Removing album (folder excluded)");
                    match self.service.delete_album(&album.id).await {
                        Ok(()) => counters.albums_deleted += 1,
                        Err(e) => {
                            warn!(album = %title, error = %e, "Failed to remove album");
                            counters.errors += 1;
                        }
                    }
                }
                _ => counters.folders_skipped += 1,
            }
            return VisitedFolder {
                state: FolderState::Excluded,
                title,
                access: pending.inherited,
            };
        }

        debug!(folder = %folder.path().display(), album = %title, "Syncing folder");
        let access = self.access.determine_access(folder, pending.inherited).await;

        let state = match files {
            Ok(files) if files.is_empty() => FolderState::Empty,
            Ok(files) => match self
                .sync_album(&title, access, existing, &files, counters)
                .await
            {
                Ok(()) => FolderState::Synced,
                Err(e) => {
                    warn!(folder = %folder.name(), error = %format!("{e:#}"), "Skipping folder");
                    counters.errors += 1;
                    FolderState::SyncFailed
                }
            },
            Err(e) => {
                warn!(folder = %folder.name(), error = %e, "Skipping folder (cannot list files)");
                counters.errors += 1;
                FolderState::SyncFailed
            }
        };

        VisitedFolder {
            state,
            title,
            access,
        }
    }

    /// Makes the album match the folder: access, stale entries, new files
    async fn sync_album(
        &self,
        title: &str,
        access: AlbumAccess,
        existing: Option<&RemoteAlbum>,
        files: &SourceFiles,
        counters: &mut SyncCounters,
    ) -> Result<()> {
        let album = match existing {
            Some(album) if album.access != access => {
                debug!(album = %title, from = %album.access, to = %access, "Updating album");
                let updated = self
                    .service
                    .update_album(&album.with_access(access, Utc::now()))
                    .await
                    .with_context(|| format!("Failed to update album '{title}'"))?;
                counters.albums_updated += 1;
                updated
            }
            Some(album) => album.clone(),
            None => {
                debug!(album = %title, %access, "Creating album");
                let created = self
                    .service
                    .create_album(&self.options.account, title, title, access)
                    .await
                    .with_context(|| format!("Failed to create album '{title}'"))?;
                counters.albums_created += 1;
                created
            }
        };

        let entries = self
            .service
            .list_entries(&album.id)
            .await
            .with_context(|| format!("Failed to list entries of album '{title}'"))?;
        let mut listing = EntryListing::new(entries);

        self.delete_stale_entries(files, &mut listing, counters)
            .await?;

        let mut ordered: Vec<&LocalFile> = files.values().collect();
        ordered.sort_by_key(|f| f.modified);
        for file in ordered {
            self.add_file_to_album(file, &album, &listing, counters)
                .await;
        }

        Ok(())
    }

    /// Delete pass: clears the album, or removes entries that are gone
    /// locally or older than their local file. A no-op in add-only mode.
    async fn delete_stale_entries(
        &self,
        files: &SourceFiles,
        listing: &mut EntryListing,
        counters: &mut SyncCounters,
    ) -> Result<()> {
        if self.options.add_only {
            return Ok(());
        }

        let doomed: Vec<(RemoteEntry, &'static str)> = listing
            .active()
            .filter_map(|entry| {
                let reason = if self.options.clear_albums_first {
                    Some("album cleared first")
                } else {
                    match files.get(&entry.title) {
                        None => Some("not in source folder"),
                        Some(local) if local.modified > entry.published => {
                            Some("updated since last upload")
                        }
                        Some(_) => None,
                    }
                };
                reason.map(|r| (entry.clone(), r))
            })
            .collect();

        for (entry, reason) in doomed {
            debug!(file = %entry.title, reason, "Deleting album entry");
            self.service
                .delete_entry(&entry.id)
                .await
                .with_context(|| format!("Failed to delete entry '{}'", entry.title))?;
            listing.mark_deleted(&entry.id);
            counters.files_removed += 1;
        }

        Ok(())
    }

    // ========================================================================
    // File level
    // ========================================================================

    /// Uploads one file unless an active entry already carries its name.
    ///
    /// Never fails: errors are logged and counted.
    pub async fn add_file_to_album(
        &self,
        file: &LocalFile,
        album: &RemoteAlbum,
        listing: &EntryListing,
        counters: &mut SyncCounters,
    ) {
        if listing.find_active(&file.name).is_some() {
            debug!(file = %file.name, "Skipping file (already exists)");
            counters.files_skipped += 1;
            return;
        }

        match self.upload_file(file, album).await {
            Ok(entry) => {
                debug!(file = %file.name, entry = %entry.id, "File uploaded");
                counters.files_uploaded += 1;
            }
            Err(e) => {
                warn!(file = %file.name, error = %format!("{e:#}"), "Skipping file");
                counters.errors += 1;
            }
        }
    }

    async fn upload_file(&self, file: &LocalFile, album: &RemoteAlbum) -> Result<RemoteEntry> {
        let media = MediaType::from_path(&file.path)?;

        let transformed: Option<PathBuf> = if media.is_video() && self.options.resize_videos {
            let command = self
                .video_command
                .as_ref()
                .context("Video resizing is enabled but no valid command is configured")?;
            debug!(file = %file.path.display(), "Resizing video");
            Some(video::transform(&file.path, command).await?)
        } else {
            None
        };

        let source = transformed.as_deref().unwrap_or(&file.path);
        let result = self.send_file(file, source, media, album).await;

        if let Some(path) = transformed {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(file = %file.name, path = %path.display(), error = %e, "Failed to delete resized video");
            }
        }

        result
    }

    async fn send_file(
        &self,
        file: &LocalFile,
        source: &Path,
        media: MediaType,
        album: &RemoteAlbum,
    ) -> Result<RemoteEntry> {
        let data = match media.photo_format() {
            Some(format) if self.options.resize_photos => {
                debug!(file = %file.path.display(), "Resizing photo");
                let max = self.options.photo_max_size;
                photo::resize_file(source, format, max, max).await?
            }
            _ => tokio::fs::read(source)
                .await
                .with_context(|| format!("Failed to read {}", source.display()))?,
        };

        debug!(file = %file.path.display(), bytes = data.len(), "Uploading file");
        let entry = self
            .service
            .upload_entry(&album.id, &file.name, media.content_type, data)
            .await?;
        Ok(entry)
    }
}

async fn open_root(root: &Path) -> Result<LocalFolder, SyncError> {
    let canonical = match tokio::fs::canonicalize(root).await {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SyncError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => return Err(SyncError::Io(e)),
    };
    match LocalFolder::open(&canonical).await {
        Ok(folder) => Ok(folder),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SyncError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(SyncError::Io(e)),
    }
}
