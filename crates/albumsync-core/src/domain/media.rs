//! Media classification
//!
//! Maps a file name extension to a [`MediaKind`] and the content type sent
//! with the upload. Unrecognized extensions are rejected.

use std::path::Path;

use super::errors::DomainError;

/// Raster formats the photo resize step can re-encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoFormat {
    Jpeg,
    Gif,
    Tiff,
    Png,
    Bmp,
}

impl PhotoFormat {
    /// Whether the format carries embedded EXIF/ICC metadata worth preserving
    #[must_use]
    pub const fn carries_metadata(&self) -> bool {
        matches!(self, PhotoFormat::Jpeg)
    }
}

/// Kind of media a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image(PhotoFormat),
    Video,
}

/// Classification result for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType {
    pub kind: MediaKind,
    pub content_type: &'static str,
}

impl MediaType {
    const fn image(format: PhotoFormat, content_type: &'static str) -> Self {
        Self {
            kind: MediaKind::Image(format),
            content_type,
        }
    }

    const fn video(content_type: &'static str) -> Self {
        Self {
            kind: MediaKind::Video,
            content_type,
        }
    }

    /// Classifies a file by its final extension (case-insensitive)
    ///
    /// # Errors
    /// Returns [`DomainError::UnsupportedMediaType`] for unknown or missing extensions
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let media = match extension.as_str() {
            "jpg" | "jpeg" => Self::image(PhotoFormat::Jpeg, "image/jpeg"),
            "gif" => Self::image(PhotoFormat::Gif, "image/gif"),
            "tif" | "tiff" => Self::image(PhotoFormat::Tiff, "image/tiff"),
            "png" => Self::image(PhotoFormat::Png, "image/png"),
            "bmp" => Self::image(PhotoFormat::Bmp, "image/bmp"),
            "avi" => Self::video("video/x-msvideo"),
            "wmv" => Self::video("video/x-ms-wmv"),
            "mpg" => Self::video("video/mpeg"),
            "asf" => Self::video("video/x-ms-asf"),
            "mov" => Self::video("video/quicktime"),
            "mp4" => Self::video("video/mp4"),
            _ => return Err(DomainError::UnsupportedMediaType(format!(".{extension}"))),
        };
        Ok(media)
    }

    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self.kind, MediaKind::Image(_))
    }

    #[must_use]
    pub const fn is_video(&self) -> bool {
        matches!(self.kind, MediaKind::Video)
    }

    /// The raster format, if this is an image
    #[must_use]
    pub const fn photo_format(&self) -> Option<PhotoFormat> {
        match self.kind {
            MediaKind::Image(format) => Some(format),
            MediaKind::Video => None,
        }
    }
}
