//! Remote album and entry types
//!
//! A [`RemoteAlbum`] is the remote counterpart of one local folder, matched by
//! exact title. A [`RemoteEntry`] is one photo or video inside an album,
//! matched against a local file by name.
//!
//! Entries deleted during a folder pass are not removed from the in-memory
//! listing. [`EntryListing`] keeps an explicit [`EntryState`] per entry and
//! every lookup filters out [`EntryState::Deleted`] entries.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// Identifiers
// ============================================================================

/// Remote album identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlbumId(String);

impl AlbumId {
    /// Create a new AlbumId
    ///
    /// # Errors
    /// Returns error if the ID is empty
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId("Album ID cannot be empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlbumId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AlbumId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AlbumId> for String {
    fn from(id: AlbumId) -> Self {
        id.0
    }
}

/// Remote entry (photo/video) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Create a new EntryId
    ///
    /// # Errors
    /// Returns error if the ID is empty
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId("Entry ID cannot be empty".to_string()));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EntryId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

// ============================================================================
// AlbumAccess
// ============================================================================

/// Visibility of a remote album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumAccess {
    Public,
    #[default]
    Private,
}

impl AlbumAccess {
    /// Lowercase wire/config representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlbumAccess::Public => "public",
            AlbumAccess::Private => "private",
        }
    }
}

impl Display for AlbumAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlbumAccess {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(AlbumAccess::Public),
            "private" => Ok(AlbumAccess::Private),
            other => Err(DomainError::InvalidAccess(other.to_string())),
        }
    }
}

// ============================================================================
// RemoteAlbum
// ============================================================================

/// A named remote collection of media entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAlbum {
    pub id: AlbumId,
    /// Matching key against the title computed for a local folder
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub access: AlbumAccess,
    pub updated: DateTime<Utc>,
}

impl RemoteAlbum {
    /// Returns a copy with a different access and a refreshed update timestamp.
    ///
    /// Title and summary are left untouched.
    #[must_use]
    pub fn with_access(&self, access: AlbumAccess, now: DateTime<Utc>) -> Self {
        Self {
            access,
            updated: now,
            ..self.clone()
        }
    }
}

/// Finds the first album whose title equals `title` exactly
pub fn find_album_by_title<'a>(albums: &'a [RemoteAlbum], title: &str) -> Option<&'a RemoteAlbum> {
    albums.iter().find(|a| a.title == title)
}

// ============================================================================
// RemoteEntry and the per-pass listing
// ============================================================================

/// A remote photo/video item inside an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub id: EntryId,
    /// Matched against the local file name
    pub title: String,
    /// Upload time, compared against the local modification time
    pub published: DateTime<Utc>,
}

/// Lifecycle of an entry within one folder pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Active,
    Deleted,
}

/// Snapshot of an album's entries for one folder pass
#[derive(Debug, Clone, Default)]
pub struct EntryListing {
    entries: Vec<(RemoteEntry, EntryState)>,
}

impl EntryListing {
    /// Wraps a freshly fetched listing; every entry starts `Active`.
    #[must_use]
    pub fn new(entries: Vec<RemoteEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e, EntryState::Active))
                .collect(),
        }
    }

    /// All entries in listing order, including tombstoned ones
    pub fn iter(&self) -> impl Iterator<Item = (&RemoteEntry, EntryState)> {
        self.entries.iter().map(|(e, s)| (e, *s))
    }

    /// Entries still active in this pass
    pub fn active(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.entries
            .iter()
            .filter(|(_, s)| *s == EntryState::Active)
            .map(|(e, _)| e)
    }

    /// First active entry whose title equals `title`
    #[must_use]
    pub fn find_active(&self, title: &str) -> Option<&RemoteEntry> {
        self.active().find(|e| e.title == title)
    }

    /// Tombstones the entry with the given ID.
    ///
    /// Returns `false` if no such entry exists.
    pub fn mark_deleted(&mut self, id: &EntryId) -> bool {
        match self.entries.iter_mut().find(|(e, _)| &e.id == id) {
            Some((_, state)) => {
                *state = EntryState::Deleted;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
