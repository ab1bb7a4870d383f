//! Album service port (driven/secondary port)
//!
//! This module defines the interface for interacting with a remote,
//! hierarchical photo-album collection. The sync engine only ever talks to
//! the remote side through [`IAlbumService`].
//!
//! ## Design Notes
//!
//! - Methods return [`AlbumServiceError`], a classified error whose
//!   `Unauthorized` variant marks authentication failures.
//! - Uses `#[async_trait]` for async trait methods.
//! - Every call may block on the network; the trait imposes no timeout.

use thiserror::Error;

use crate::domain::album::{AlbumAccess, AlbumId, EntryId, RemoteAlbum, RemoteEntry};

/// Errors reported by an album service adapter
#[derive(Debug, Error)]
pub enum AlbumServiceError {
    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The album or entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service refused the request
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AlbumServiceError {
    /// Whether this is the distinguished authentication failure
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, AlbumServiceError::Unauthorized(_))
    }
}

/// Port trait for remote album collection operations
///
/// ## Implementation Notes
///
/// - The account whose albums are managed is passed to the listing and
///   creation calls; album and entry IDs are globally addressable.
/// - `update_album` sends the full album; only access and the updated
///   timestamp are expected to differ from what the service holds.
#[async_trait::async_trait]
pub trait IAlbumService: Send + Sync {
    /// Lists every album of the account
    async fn list_albums(&self, account: &str) -> Result<Vec<RemoteAlbum>, AlbumServiceError>;

    /// Lists the entries of one album
    async fn list_entries(&self, album_id: &AlbumId)
        -> Result<Vec<RemoteEntry>, AlbumServiceError>;

    /// Creates an album and returns it as stored by the service
    async fn create_album(
        &self,
        account: &str,
        title: &str,
        summary: &str,
        access: AlbumAccess,
    ) -> Result<RemoteAlbum, AlbumServiceError>;

    /// Replaces an album's mutable fields
    async fn update_album(&self, album: &RemoteAlbum) -> Result<RemoteAlbum, AlbumServiceError>;

    /// Deletes an album and everything in it
    async fn delete_album(&self, album_id: &AlbumId) -> Result<(), AlbumServiceError>;

    /// Uploads one photo or video into an album
    ///
    /// # Arguments
    /// * `album_id` - Target album
    /// * `file_name` - Becomes the entry title
    /// * `content_type` - MIME type of `data`
    /// * `data` - The (possibly transformed) file contents
    async fn upload_entry(
        &self,
        album_id: &AlbumId,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteEntry, AlbumServiceError>;

    /// Deletes one entry
    async fn delete_entry(&self, entry_id: &EntryId) -> Result<(), AlbumServiceError>;
}
