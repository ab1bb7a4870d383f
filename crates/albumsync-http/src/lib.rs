//! albumsync HTTP - JSON album service client
//!
//! Provides:
//! - A bearer-token HTTP client for the album API
//! - [`provider::HttpAlbumService`], the `IAlbumService` implementation
//!
//! ## Modules
//!
//! - [`client`] - HTTP client: URL building, auth header, status mapping
//! - [`provider`] - Album and entry operations on top of the client

pub mod client;
pub mod provider;

use reqwest::StatusCode;
use thiserror::Error;

use albumsync_core::ports::AlbumServiceError;

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur when talking to the album API
#[derive(Debug, Error)]
pub enum HttpError {
    /// Credentials are missing, invalid or expired (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token is valid but not allowed to touch the resource (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL cannot carry API paths
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// The response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl HttpError {
    /// Classifies a non-success response
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let mut message = body.trim().to_string();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string();
        }

        match status {
            StatusCode::UNAUTHORIZED => HttpError::Unauthorized(message),
            StatusCode::FORBIDDEN => HttpError::Forbidden(message),
            StatusCode::NOT_FOUND => HttpError::NotFound(message),
            _ => HttpError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<HttpError> for AlbumServiceError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Unauthorized(msg) | HttpError::Forbidden(msg) => {
                AlbumServiceError::Unauthorized(msg)
            }
            HttpError::NotFound(msg) => AlbumServiceError::NotFound(msg),
            HttpError::Status { status, message } => AlbumServiceError::Rejected { status, message },
            HttpError::Network(e) if e.is_decode() => AlbumServiceError::InvalidResponse(e.to_string()),
            HttpError::Network(e) => AlbumServiceError::Network(e.to_string()),
            HttpError::InvalidUrl(msg) => AlbumServiceError::Network(format!("invalid base URL: {msg}")),
            HttpError::InvalidResponse(msg) => AlbumServiceError::InvalidResponse(msg),
        }
    }
}
