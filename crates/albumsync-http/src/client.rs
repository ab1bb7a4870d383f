//! Album API HTTP client
//!
//! Provides an authenticated HTTP client for the album API. Handles the
//! bearer header, escaped URL construction, status classification and JSON
//! decoding.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use albumsync_http::client::AlbumApiClient;
//! use reqwest::Method;
//!
//! # async fn example() -> Result<(), albumsync_http::HttpError> {
//! let client = AlbumApiClient::new("https://photos.example.com/api", "token");
//! let request = client.request(Method::GET, &["accounts", "me", "albums"])?;
//! let body: serde_json::Value = client.send_json(request).await?;
//! # Ok(())
//! # }
//! ```

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::HttpError;

/// User agent sent with every request
const USER_AGENT: &str = concat!("albumsync/", env!("CARGO_PKG_VERSION"));

/// HTTP client for album API calls
///
/// Wraps `reqwest::Client` with authentication headers and base URL
/// construction.
#[derive(Debug, Clone)]
pub struct AlbumApiClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Bearer token
    access_token: String,
}

impl AlbumApiClient {
    /// Creates a client for the API rooted at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://photos.example.com/api/v1`
    /// * `access_token` - Bearer token sent with every request
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of `segments` below the base URL.
    ///
    /// Each segment is percent-escaped, so IDs and account names may
    /// contain `/` or spaces.
    pub fn url(&self, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| HttpError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Creates an authenticated request builder for the given method and path
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, HttpError> {
        let url = self.url(segments)?;
        debug!(%method, %url, "Album API request");
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(&self.access_token))
    }

    /// Sends a request and fails on any non-success status
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, HttpError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Album API error response");
        Err(HttpError::from_status(status, &body))
    }

    /// Sends a request and decodes the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, HttpError> {
        let bytes = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| HttpError::InvalidResponse(e.to_string()))
    }
}
