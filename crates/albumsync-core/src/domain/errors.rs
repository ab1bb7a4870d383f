//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including media classification failures and identifier validation.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The file extension does not map to a known photo or video type
    #[error("Unsupported media type: extension '{0}' was not handled")]
    UnsupportedMediaType(String),

    /// An album or entry identifier was empty
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Unknown album access value
    #[error("Invalid album access: {0}")]
    InvalidAccess(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
