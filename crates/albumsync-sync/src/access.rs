//! Album access resolution
//!
//! First match wins:
//! 1. folder name is in the private-folder list -> private
//! 2. private marker file present -> private
//! 3. public marker file present -> public
//! 4. otherwise the parent's resolved access

use tracing::debug;

use albumsync_core::domain::AlbumAccess;

use crate::engine::SyncOptions;
use crate::local::LocalFolder;

/// Resolves the access of each folder's album
#[derive(Debug, Clone)]
pub struct AccessResolver {
    private_folder_names: Vec<String>,
    private_marker: Option<String>,
    public_marker: Option<String>,
}

impl AccessResolver {
    pub fn new(options: &SyncOptions) -> Self {
        let marker = |m: &Option<String>| m.clone().filter(|m| !m.trim().is_empty());
        Self {
            private_folder_names: options.private_folder_names.clone(),
            private_marker: marker(&options.private_marker_file),
            public_marker: marker(&options.public_marker_file),
        }
    }

    /// Access for `folder` given the access resolved for its parent
    pub async fn determine_access(&self, folder: &LocalFolder, inherited: AlbumAccess) -> AlbumAccess {
        if self.private_folder_names.iter().any(|n| n == folder.name()) {
            debug!(folder = %folder.name(), "Album marked private (folder name)");
            return AlbumAccess::Private;
        }

        if let Some(marker) = &self.private_marker {
            if folder.contains_file(marker).await {
                debug!(folder = %folder.name(), marker = %marker, "Album marked private (marker file)");
                return AlbumAccess::Private;
            }
        }

        if let Some(marker) = &self.public_marker {
            if folder.contains_file(marker).await {
                debug!(folder = %folder.name(), marker = %marker, "Album marked public (marker file)");
                return AlbumAccess::Public;
            }
        }

        inherited
    }
}
