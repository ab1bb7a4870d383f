//! Shared test helpers: a recording album service and folder-tree builders

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};

use albumsync_core::config::ConfigBuilder;
use albumsync_core::domain::{AlbumAccess, AlbumId, EntryId, RemoteAlbum, RemoteEntry};
use albumsync_core::ports::{AlbumServiceError, IAlbumService};
use albumsync_sync::{SyncEngine, SyncOptions};

/// A call received by [`FakeAlbumService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAlbums(String),
    ListEntries(String),
    CreateAlbum {
        title: String,
        summary: String,
        access: AlbumAccess,
    },
    UpdateAlbum {
        title: String,
        access: AlbumAccess,
    },
    DeleteAlbum(String),
    Upload {
        album: String,
        file_name: String,
        content_type: String,
    },
    DeleteEntry(String),
}

/// Failure injected into the album listing
#[derive(Debug, Clone, Copy)]
pub enum ListingFailure {
    Unauthorized,
    Network,
}

#[derive(Default)]
struct State {
    albums: Vec<RemoteAlbum>,
    entries: HashMap<AlbumId, Vec<RemoteEntry>>,
    calls: Vec<Call>,
    uploaded: HashMap<String, Vec<u8>>,
    next_id: u32,
    listing_failure: Option<ListingFailure>,
    failing_uploads: HashSet<String>,
    failing_entry_listings: HashSet<String>,
    failing_entry_deletes: HashSet<String>,
    failing_album_deletes: HashSet<String>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn album_title(&self, id: &AlbumId) -> String {
        self.albums
            .iter()
            .find(|a| &a.id == id)
            .map(|a| a.title.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// In-memory [`IAlbumService`] that records every call
#[derive(Default)]
pub struct FakeAlbumService {
    state: Mutex<State>,
}

impl FakeAlbumService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seeds an existing remote album
    pub fn with_album(&self, title: &str, access: AlbumAccess) -> AlbumId {
        let mut state = self.state.lock().unwrap();
        let id = AlbumId::new(state.next_id("album")).unwrap();
        state.albums.push(RemoteAlbum {
            id: id.clone(),
            title: title.to_string(),
            summary: title.to_string(),
            access,
            updated: at(2020, 1, 1),
        });
        state.entries.insert(id.clone(), Vec::new());
        id
    }

    /// Seeds an entry inside an existing album
    pub fn with_entry(&self, album: &AlbumId, title: &str, published: DateTime<Utc>) -> EntryId {
        let mut state = self.state.lock().unwrap();
        let id = EntryId::new(state.next_id("entry")).unwrap();
        state.entries.entry(album.clone()).or_default().push(RemoteEntry {
            id: id.clone(),
            title: title.to_string(),
            published,
        });
        id
    }

    pub fn fail_listing(&self, failure: ListingFailure) {
        self.state.lock().unwrap().listing_failure = Some(failure);
    }

    pub fn fail_upload(&self, file_name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_uploads
            .insert(file_name.to_string());
    }

    pub fn fail_entry_listing(&self, album_title: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_entry_listings
            .insert(album_title.to_string());
    }

    /// Makes deleting the entry titled `entry_title` fail
    pub fn fail_delete_entry(&self, entry_title: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_entry_deletes
            .insert(entry_title.to_string());
    }

    /// Makes deleting the album titled `album_title` fail
    pub fn fail_delete_album(&self, album_title: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_album_deletes
            .insert(album_title.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than the initial album listing
    pub fn changes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::ListAlbums(_) | Call::ListEntries(_)))
            .collect()
    }

    /// Uploaded file names in upload order
    pub fn uploads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload { file_name, .. } => Some(file_name),
                _ => None,
            })
            .collect()
    }

    /// Titles of created albums in creation order
    pub fn created_albums(&self) -> Vec<(String, AlbumAccess)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateAlbum { title, access, .. } => Some((title, access)),
                _ => None,
            })
            .collect()
    }

    pub fn uploaded_data(&self, file_name: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().uploaded.get(file_name).cloned()
    }

    pub fn has_deletes(&self) -> bool {
        self.calls()
            .iter()
            .any(|c| matches!(c, Call::DeleteAlbum(_) | Call::DeleteEntry(_)))
    }
}

#[async_trait::async_trait]
impl IAlbumService for FakeAlbumService {
    async fn list_albums(&self, account: &str) -> Result<Vec<RemoteAlbum>, AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListAlbums(account.to_string()));
        match state.listing_failure {
            Some(ListingFailure::Unauthorized) => {
                Err(AlbumServiceError::Unauthorized("token rejected".into()))
            }
            Some(ListingFailure::Network) => {
                Err(AlbumServiceError::Network("connection refused".into()))
            }
            None => Ok(state.albums.clone()),
        }
    }

    async fn list_entries(&self, album_id: &AlbumId) -> Result<Vec<RemoteEntry>, AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        let title = state.album_title(album_id);
        state.calls.push(Call::ListEntries(title.clone()));
        if state.failing_entry_listings.contains(&title) {
            return Err(AlbumServiceError::Rejected {
                status: 500,
                message: "listing broke".into(),
            });
        }
        state
            .entries
            .get(album_id)
            .cloned()
            .ok_or_else(|| AlbumServiceError::NotFound(album_id.to_string()))
    }

    async fn create_album(
        &self,
        _account: &str,
        title: &str,
        summary: &str,
        access: AlbumAccess,
    ) -> Result<RemoteAlbum, AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateAlbum {
            title: title.to_string(),
            summary: summary.to_string(),
            access,
        });
        let album = RemoteAlbum {
            id: AlbumId::new(state.next_id("album")).unwrap(),
            title: title.to_string(),
            summary: summary.to_string(),
            access,
            updated: Utc::now(),
        };
        state.albums.push(album.clone());
        state.entries.insert(album.id.clone(), Vec::new());
        Ok(album)
    }

    async fn update_album(&self, album: &RemoteAlbum) -> Result<RemoteAlbum, AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateAlbum {
            title: album.title.clone(),
            access: album.access,
        });
        if let Some(stored) = state.albums.iter_mut().find(|a| a.id == album.id) {
            *stored = album.clone();
        }
        Ok(album.clone())
    }

    async fn delete_album(&self, album_id: &AlbumId) -> Result<(), AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        let title = state.album_title(album_id);
        state.calls.push(Call::DeleteAlbum(title.clone()));
        if state.failing_album_deletes.contains(&title) {
            return Err(AlbumServiceError::Rejected {
                status: 500,
                message: "album delete refused".into(),
            });
        }
        state.albums.retain(|a| &a.id != album_id);
        state.entries.remove(album_id);
        Ok(())
    }

    async fn upload_entry(
        &self,
        album_id: &AlbumId,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RemoteEntry, AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        let title = state.album_title(album_id);
        state.calls.push(Call::Upload {
            album: title,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        });
        if state.failing_uploads.contains(file_name) {
            return Err(AlbumServiceError::Rejected {
                status: 400,
                message: "upload refused".into(),
            });
        }
        let entry = RemoteEntry {
            id: EntryId::new(state.next_id("entry")).unwrap(),
            title: file_name.to_string(),
            published: Utc::now(),
        };
        state.uploaded.insert(file_name.to_string(), data);
        state
            .entries
            .entry(album_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn delete_entry(&self, entry_id: &EntryId) -> Result<(), AlbumServiceError> {
        let mut state = self.state.lock().unwrap();
        let title = state
            .entries
            .values()
            .flatten()
            .find(|e| &e.id == entry_id)
            .map(|e| e.title.clone())
            .unwrap_or_else(|| entry_id.to_string());
        state.calls.push(Call::DeleteEntry(title.clone()));
        if state.failing_entry_deletes.contains(&title) {
            return Err(AlbumServiceError::Rejected {
                status: 500,
                message: "entry delete refused".into(),
            });
        }
        for entries in state.entries.values_mut() {
            entries.retain(|e| &e.id != entry_id);
        }
        Ok(())
    }
}

// ============================================================================
// Folder-tree helpers
// ============================================================================

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Creates `dir/name` (and parents) and returns its path
pub fn folder(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::create_dir_all(&path).unwrap();
    // distinct creation times keep sibling order deterministic
    std::thread::sleep(std::time::Duration::from_millis(15));
    path
}

/// Writes a file with the given contents and modification time
pub fn file_at(dir: &Path, name: &str, contents: &[u8], modified: DateTime<Utc>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    let handle = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    handle.set_modified(SystemTime::from(modified)).unwrap();
    path
}

/// Writes a small file modified on 2024-01-01
pub fn file(dir: &Path, name: &str) -> PathBuf {
    file_at(dir, name, b"media bytes", at(2024, 1, 1))
}

/// Options with photo resizing off so tests can use placeholder bytes
pub fn options() -> SyncOptions {
    let config = ConfigBuilder::new()
        .service("http://albums.test", "tester")
        .include_extensions(["jpg", "png", "mov"])
        .resize_photos(false, 800)
        .build_validated()
        .unwrap();
    SyncOptions::from_config(&config)
}

pub fn engine(service: &Arc<FakeAlbumService>, options: SyncOptions) -> SyncEngine {
    SyncEngine::new(service.clone(), options)
}
