//! In-memory photo compression.
//!
//! Uploaded photos are downscaled to a bounded dimension and re-encoded as
//! JPEG before they are stored in the project file or attached to a
//! generation request. This keeps the project file small and the request
//! payload inside the model's input limits.
//!
//! Decoding and encoding use the `image` crate's pure-Rust codecs (JPEG,
//! PNG, WebP inputs; JPEG output) with Lanczos3 resampling — everything is
//! statically linked, no system dependencies.

use crate::imaging::calculations::fit_within;
use crate::project::ImageData;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use thiserror::Error;

/// Longer-side bound applied when no explicit maximum is given.
pub const DEFAULT_MAX_DIM: u32 = 1600;

/// JPEG quality for re-encoded photos (the 0.8 canvas quality equivalent).
const JPEG_QUALITY: u8 = 80;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
}

/// A compressed photo with its final pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub image: ImageData,
    pub width: u32,
    pub height: u32,
}

/// Decode `bytes`, clamp the longer side to [`DEFAULT_MAX_DIM`], and
/// re-encode as JPEG.
pub fn compress_image(bytes: &[u8]) -> Result<CompressedImage, CompressError> {
    compress_image_with_max(bytes, DEFAULT_MAX_DIM)
}

/// As [`compress_image`], with an explicit longer-side bound.
///
/// Images already within the bound keep their dimensions (they are still
/// re-encoded, so the output is always a JPEG). Deterministic for identical
/// input bytes.
pub fn compress_image_with_max(
    bytes: &[u8],
    max_dim: u32,
) -> Result<CompressedImage, CompressError> {
    let decoded = image::load_from_memory(bytes).map_err(CompressError::Decode)?;

    let (target_w, target_h) = fit_within((decoded.width(), decoded.height()), max_dim);
    let resized = if (target_w, target_h) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = resized.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(CompressError::Encode)?;

    Ok(CompressedImage {
        image: ImageData::jpeg(out),
        width: target_w,
        height: target_h,
    })
}
