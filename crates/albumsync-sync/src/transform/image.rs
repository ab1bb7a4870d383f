//! Aspect-ratio-preserving photo resize
//!
//! The photo is decoded, scaled to fit inside a bounding box and re-encoded
//! in its source format. JPEG output carries the source EXIF and ICC
//! segments unchanged. Photos that already fit are returned byte-for-byte.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF, ImageICC};
use tracing::debug;

use albumsync_core::domain::PhotoFormat;

use super::TransformError;

/// Bounds at or below this size take the thumbnail path
const THUMBNAIL_BOUND: u32 = 150;

/// Quality of re-encoded JPEGs
const JPEG_QUALITY: u8 = 90;

/// Computes the size of a `width`×`height` image scaled to fit inside
/// `max_width`×`max_height`.
///
/// Returns the source size when it already fits. Otherwise the bound side is
/// fitted exactly and the other side is scaled proportionally, rounding half
/// to even. Equal aspect ratios yield exactly the bounds.
pub fn target_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));

    // w/h compared against max_w/max_h
    let source = w * max_h;
    let bound = max_w * h;

    if source == bound {
        (max_width, max_height)
    } else if source < bound {
        (div_round_half_even(max_h * w, h), max_height)
    } else {
        (max_width, div_round_half_even(max_w * h, w))
    }
}

fn div_round_half_even(numerator: u64, denominator: u64) -> u32 {
    let quotient = numerator / denominator;
    let twice_remainder = (numerator % denominator) * 2;
    let round_up = twice_remainder > denominator
        || (twice_remainder == denominator && quotient % 2 == 1);
    let rounded = if round_up { quotient + 1 } else { quotient };
    u32::try_from(rounded.max(1)).unwrap_or(u32::MAX)
}

fn image_format(format: PhotoFormat) -> ImageFormat {
    match format {
        PhotoFormat::Jpeg => ImageFormat::Jpeg,
        PhotoFormat::Gif => ImageFormat::Gif,
        PhotoFormat::Tiff => ImageFormat::Tiff,
        PhotoFormat::Png => ImageFormat::Png,
        PhotoFormat::Bmp => ImageFormat::Bmp,
    }
}

/// Resizes an encoded photo to fit inside `max_width`×`max_height`.
///
/// # Errors
/// Returns [`TransformError::Image`] when decoding or encoding fails and
/// [`TransformError::Metadata`] when the JPEG segments cannot be rewritten.
pub fn resize(
    data: Vec<u8>,
    format: PhotoFormat,
    max_width: u32,
    max_height: u32,
) -> Result<Vec<u8>, TransformError> {
    let source = image::load_from_memory_with_format(&data, image_format(format))?;
    let (width, height) = (source.width(), source.height());
    let (new_width, new_height) = target_dimensions(width, height, max_width, max_height);

    if (new_width, new_height) == (width, height) {
        debug!(width, height, "Photo already within bounds");
        return Ok(data);
    }

    let resized = if max_width <= THUMBNAIL_BOUND && max_height <= THUMBNAIL_BOUND {
        source.thumbnail_exact(new_width, new_height)
    } else {
        source.resize_exact(new_width, new_height, FilterType::Lanczos3)
    };
    drop(source);

    debug!(width, height, new_width, new_height, "Photo resized");

    let encoded = encode(&resized, format)?;
    if format.carries_metadata() {
        copy_jpeg_metadata(&data, encoded)
    } else {
        Ok(encoded)
    }
}

/// Reads a photo from disk and resizes it on the blocking pool.
pub async fn resize_file(
    path: &Path,
    format: PhotoFormat,
    max_width: u32,
    max_height: u32,
) -> Result<Vec<u8>, TransformError> {
    let data = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || resize(data, format, max_width, max_height))
        .await
        .map_err(|e| TransformError::Task(e.to_string()))?
}

fn encode(img: &DynamicImage, format: PhotoFormat) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        PhotoFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            if img.color().has_alpha() {
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
            } else {
                img.write_with_encoder(encoder)?;
            }
        }
        PhotoFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buffer, ImageFormat::Gif)?;
        }
        PhotoFormat::Png => img.write_to(&mut buffer, ImageFormat::Png)?,
        PhotoFormat::Tiff | PhotoFormat::Bmp => {
            let normalized = if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            };
            normalized.write_to(&mut buffer, image_format(format))?;
        }
    }
    Ok(buffer.into_inner())
}

/// Transplants the EXIF and ICC segments of `original` into `encoded`.
fn copy_jpeg_metadata(original: &[u8], encoded: Vec<u8>) -> Result<Vec<u8>, TransformError> {
    let source = Jpeg::from_bytes(Bytes::copy_from_slice(original))
        .map_err(|e| TransformError::Metadata(e.to_string()))?;
    let exif = source.exif();
    let icc = source.icc_profile();
    if exif.is_none() && icc.is_none() {
        return Ok(encoded);
    }

    let mut target = Jpeg::from_bytes(Bytes::from(encoded))
        .map_err(|e| TransformError::Metadata(e.to_string()))?;
    target.set_exif(exif);
    target.set_icc_profile(icc);

    let mut out = Vec::new();
    target.encoder().write_to(&mut out)?;
    Ok(out)
}
