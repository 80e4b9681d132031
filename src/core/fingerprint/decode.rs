//! Image decoding with a fast path for JPEG.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for other formats. Any failure surfaces as
//! [`FingerprintError::Decode`] so callers can drop the image from the
//! failing algorithm only.

use crate::error::FingerprintError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use tracing::debug;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decoder that picks the fastest available backend per format
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode an image from a file path.
    ///
    /// JPEG goes through zune-jpeg first and retries with the image
    /// crate if zune rejects it.
    pub fn decode(path: &Path) -> Result<DynamicImage, FingerprintError> {
        let image = if is_jpeg(path) {
            Self::decode_jpeg(path).or_else(|e| {
                debug!(path = %path.display(), error = %e, "zune-jpeg failed, using image crate");
                Self::decode_fallback(path)
            })?
        } else {
            Self::decode_fallback(path)?
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(FingerprintError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(image)
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage, FingerprintError> {
        let file_bytes = fs::read(path).map_err(|e| FingerprintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let decode_error = |reason: String| FingerprintError::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder
            .decode()
            .map_err(|e| decode_error(format!("zune-jpeg decode failed: {:?}", e)))?;

        let info = decoder
            .info()
            .ok_or_else(|| decode_error("missing image info".to_string()))?;
        let width = info.width as u32;
        let height = info.height as u32;

        match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| decode_error("RGB buffer size mismatch".to_string())),
            ColorSpace::RGBA => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(|| decode_error("RGBA buffer size mismatch".to_string())),
            ColorSpace::Luma => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, pixels)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| decode_error("Luma buffer size mismatch".to_string())),
            other => Err(decode_error(format!("unsupported colorspace {:?}", other))),
        }
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, FingerprintError> {
        image::open(path).map_err(|e| FingerprintError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg")
    )
}
