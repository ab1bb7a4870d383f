//! albumsync Core - Domain types and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `RemoteAlbum`, `RemoteEntry`, `EntryListing`, `SyncCounters`
//! - **Media classification** - extension to media kind and content type
//! - **Port definitions** - `IAlbumService`, the remote album collection boundary
//! - **Configuration** - the YAML-backed `Config` consumed by the engine and CLI
//!
//! # Architecture
//!
//! The domain module contains pure decision logic with no I/O.
//! Ports define trait interfaces that adapter crates implement; the sync
//! engine in `albumsync-sync` drives them.

pub mod config;
pub mod domain;
pub mod ports;
