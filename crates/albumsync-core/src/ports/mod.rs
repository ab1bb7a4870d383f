//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IAlbumService`] - Remote album collection (list, create, update, delete, upload)

pub mod album_service;

pub use album_service::{AlbumServiceError, IAlbumService};
