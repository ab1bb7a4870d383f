//! albumsync Sync - Folder-to-album synchronization engine
//!
//! Provides:
//! - Recursive walk of a local media tree, one album per folder
//! - Folder/file inclusion rules and album access resolution
//! - Create/update/delete reconciliation against the remote album service
//! - Pre-upload photo resizing and external video transformation
//!
//! ## Modules
//!
//! - [`engine`] - Sync engine driving the walk and the per-folder passes
//! - [`filter`] - Folder exclusion and file inclusion rules
//! - [`access`] - Public/private resolution per folder
//! - [`local`] - Local folder and file snapshots
//! - [`transform`] - Photo resize and video transformation

pub mod access;
pub mod engine;
pub mod filter;
pub mod local;
pub mod transform;

use std::path::PathBuf;

use thiserror::Error;

use albumsync_core::ports::AlbumServiceError;

pub use engine::{SyncEngine, SyncOptions};

/// Errors that abort a whole synchronization run
///
/// Folder- and file-level failures never surface here; they are logged and
/// counted in the run summary instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The album service rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The initial album listing could not be fetched
    #[error("Remote album service error: {0}")]
    Remote(String),

    /// The folder to synchronize does not exist
    #[error("Folder not found: {0}")]
    RootNotFound(PathBuf),

    /// The root folder could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AlbumServiceError> for SyncError {
    fn from(err: AlbumServiceError) -> Self {
        if err.is_authentication() {
            SyncError::Authentication(err.to_string())
        } else {
            SyncError::Remote(err.to_string())
        }
    }
}
