//! HttpAlbumService - IAlbumService implementation over the album JSON API
//!
//! ## Endpoints
//!
//! | Operation     | Request                                        |
//! |---------------|------------------------------------------------|
//! | list albums   | `GET    {base}/accounts/{account}/albums`      |
//! | create album  | `POST   {base}/accounts/{account}/albums`      |
//! | update album  | `PUT    {base}/albums/{id}`                    |
//! | delete album  | `DELETE {base}/albums/{id}`                    |
//! | list entries  | `GET    {base}/albums/{id}/entries`            |
//! | upload entry  | `POST   {base}/albums/{id}/entries` (raw body) |
//! | delete entry  | `DELETE {base}/entries/{id}`                   |
//!
//! Uploads send the file bytes as the request body with the media content
//! type and the file name in a percent-encoded `Slug` header.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use albumsync_core::domain::{AlbumAccess, AlbumId, EntryId, RemoteAlbum, RemoteEntry};
use albumsync_core::ports::{AlbumServiceError, IAlbumService};

use crate::client::AlbumApiClient;

/// Header carrying the uploaded file name
const SLUG_HEADER: &str = "Slug";

/// Controls and `%`; non-ASCII bytes are always encoded
const SLUG_ENCODE_SET: &AsciiSet = &CONTROLS.add(b'%');

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AlbumList {
    albums: Vec<RemoteAlbum>,
}

#[derive(Debug, Deserialize)]
struct EntryList {
    entries: Vec<RemoteEntry>,
}

#[derive(Debug, Serialize)]
struct NewAlbum<'a> {
    title: &'a str,
    summary: &'a str,
    access: AlbumAccess,
}

/// Percent-encodes everything outside printable ASCII, plus `%` itself
fn slug(file_name: &str) -> String {
    utf8_percent_encode(file_name, SLUG_ENCODE_SET).to_string()
}

// ============================================================================
// HttpAlbumService
// ============================================================================

/// Album service backed by the album JSON API
#[derive(Debug, Clone)]
pub struct HttpAlbumService {
    client: AlbumApiClient,
}

impl HttpAlbumService {
    pub fn new(client: AlbumApiClient) -> Self {
        Self { client }
    }

    /// Shortcut for `HttpAlbumService::new(AlbumApiClient::new(..))`
    pub fn connect(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::new(AlbumApiClient::new(base_url, access_token))
    }

    pub fn client(&self) -> &AlbumApiClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IAlbumService for HttpAlbumService {
    #[tracing::instrument(skip(self))]
    async fn list_albums(&self, account: &str) -> Result<Vec<RemoteAlbum>, AlbumServiceError> {
        let request = self
            .client
            .request(Method::GET, &["accounts", account, "albums"])?;
        let list: AlbumList = self.client.send_json(request).await?;
        debug!(count = list.albums.len(), "Albums listed");
        Ok(list.albums)
    }

    #[tracing::instrument(skip(self), fields(album = %album_id))]
    async fn list_entries(
        &self,
        album_id: &AlbumId,
    ) -> Result<Vec<RemoteEntry>, AlbumServiceError> {
        let request = self
            .client
            .request(Method::GET, &["albums", album_id.as_str(), "entries"])?;
        let list: EntryList = self.client.send_json(request).await?;
        debug!(count = list.entries.len(), "Entries listed");
        Ok(list.entries)
    }

    #[tracing::instrument(skip(self, summary))]
    async fn create_album(
        &self,
        account: &str,
        title: &str,
        summary: &str,
        access: AlbumAccess,
    ) -> Result<RemoteAlbum, AlbumServiceError> {
        let request = self
            .client
            .request(Method::POST, &["accounts", account, "albums"])?
            .json(&NewAlbum {
                title,
                summary,
                access,
            });
        Ok(self.client.send_json(request).await?)
    }

    #[tracing::instrument(skip(self, album), fields(album = %album.id))]
    async fn update_album(&self, album: &RemoteAlbum) -> Result<RemoteAlbum, AlbumServiceError> {
        let request = self
            .client
            .request(Method::PUT, &["albums", album.id.as_str()])?
            .json(album);
        Ok(self.client.send_json(request).await?)
    }

    #[tracing::instrument(skip(self), fields(album = %album_id))]
    async fn delete_album(&self, album_id: &AlbumId) -> Result<(), AlbumServiceError> {
        let request = self
            .client
            .request(Method::DELETE, &["albums", album_id.as_str()])?;
        self.client.send(request).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, data), fields(album = %album_id, bytes = data.len()))]
    async fn upload_entry(
        &self,
        album_id: &AlbumId,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteEntry, AlbumServiceError> {
        let request = self
            .client
            .request(Method::POST, &["albums", album_id.as_str(), "entries"])?
            .header(CONTENT_TYPE, content_type)
            .header(SLUG_HEADER, slug(file_name))
            .body(data);
        Ok(self.client.send_json(request).await?)
    }

    #[tracing::instrument(skip(self), fields(entry = %entry_id))]
    async fn delete_entry(&self, entry_id: &EntryId) -> Result<(), AlbumServiceError> {
        let request = self
            .client
            .request(Method::DELETE, &["entries", entry_id.as_str()])?;
        self.client.send(request).await?;
        Ok(())
    }
}
