//! Domain entities and business logic
//!
//! This module contains the core domain types for albumsync:
//! - Remote album and entry types, including the per-run entry tombstones
//! - Album access (visibility)
//! - Media classification by file extension
//! - Run-scoped counters and the summary they produce
//! - Domain-specific error types

pub mod album;
pub mod counters;
pub mod errors;
pub mod media;

// Re-export commonly used types
pub use album::{
    find_album_by_title, AlbumAccess, AlbumId, EntryId, EntryListing, EntryState, RemoteAlbum,
    RemoteEntry,
};
pub use counters::{SyncCounters, SyncSummary};
pub use errors::DomainError;
pub use media::{MediaKind, MediaType, PhotoFormat};
