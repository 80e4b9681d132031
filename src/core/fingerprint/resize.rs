//! SIMD-accelerated resizing to the calibration size.
//!
//! Uses fast_image_resize, which picks AVX2/NEON when available.
//! Convolution fingerprints resize every image to one square
//! calibration size so that their grid geometry never depends on the
//! input resolution.

use crate::error::FingerprintError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{GrayImage, ImageBuffer, RgbImage};

/// Resizer reused across images of one index build
pub struct CalibrationResizer {
    resizer: Resizer,
    options: ResizeOptions,
}

impl CalibrationResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        }
    }

    /// Resize an RGB image to `size` x `size`
    pub fn resize_rgb(&mut self, image: &RgbImage, size: u32) -> Result<RgbImage, FingerprintError> {
        if image.dimensions() == (size, size) {
            return Ok(image.clone());
        }
        let (width, height) = image.dimensions();
        let raw = self.resize_raw(image.as_raw().clone(), width, height, size, PixelType::U8x3)?;
        ImageBuffer::from_raw(size, size, raw)
            .ok_or_else(|| FingerprintError::Resize("RGB result buffer size mismatch".to_string()))
    }

    /// Resize a single-channel image to `size` x `size`
    pub fn resize_gray(&mut self, image: &GrayImage, size: u32) -> Result<GrayImage, FingerprintError> {
        if image.dimensions() == (size, size) {
            return Ok(image.clone());
        }
        let (width, height) = image.dimensions();
        let raw = self.resize_raw(image.as_raw().clone(), width, height, size, PixelType::U8)?;
        ImageBuffer::from_raw(size, size, raw)
            .ok_or_else(|| FingerprintError::Resize("gray result buffer size mismatch".to_string()))
    }

    fn resize_raw(
        &mut self,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        size: u32,
        pixel_type: PixelType,
    ) -> Result<Vec<u8>, FingerprintError> {
        if width == 0 || height == 0 || size == 0 {
            return Err(FingerprintError::Resize(format!(
                "invalid dimensions {}x{} -> {}x{}",
                width, height, size, size
            )));
        }

        let src = Image::from_vec_u8(width, height, pixels, pixel_type)
            .map_err(|e| FingerprintError::Resize(format!("invalid source image: {}", e)))?;
        let mut dst = Image::new(size, size, pixel_type);

        self.resizer
            .resize(&src, &mut dst, &self.options)
            .map_err(|e| FingerprintError::Resize(e.to_string()))?;

        Ok(dst.into_vec())
    }
}

impl Default for CalibrationResizer {
    fn default() -> Self {
        Self::new()
    }
}
