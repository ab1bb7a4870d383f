//! Pre-upload media transformations
//!
//! - [`image`] - aspect-ratio-preserving photo resize
//! - [`video`] - external video transformation command

pub mod image;
pub mod video;

use thiserror::Error;

/// Errors raised while preparing a file for upload
#[derive(Debug, Error)]
pub enum TransformError {
    /// The photo could not be decoded or re-encoded
    #[error("Image processing failed: {0}")]
    Image(#[from] ::image::ImageError),

    /// Embedded metadata could not be carried over
    #[error("Failed to copy image metadata: {0}")]
    Metadata(String),

    /// The video command template is empty
    #[error("Video transform command is empty")]
    EmptyCommand,

    /// The video command could not be started
    #[error("Video transform command failed: {output}")]
    VideoCommandFailed { output: String },

    /// The video command ran but produced no usable output file
    #[error("Video transform produced no output. Command output: {output}")]
    VideoOutputMissing { output: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking worker running the transform panicked or was cancelled
    #[error("Transform task failed: {0}")]
    Task(String),
}
