//! Convolution grid fingerprints.
//!
//! One routine, four configurations:
//!
//! | Algorithm  | Channels | Pre-filter                      |
//! |------------|----------|---------------------------------|
//! | `Blur`     | RGB      | none                            |
//! | `Edge`     | RGB      | horizontal Sobel gradient       |
//! | `Sharpen`  | RGB      | 3x3 unsharp (centre 5, cross -1)|
//! | `GrayBlur` | Luma     | none                            |
//!
//! ## How It Works
//! 1. Decode and convert to the configured channel mode
//! 2. Resize to the square calibration size
//! 3. Apply the pre-filter as same-size filtering
//! 4. Box-average and keep every `stride`-th row/column from offset 0,
//!    which collapses the image to exactly 8x8 cells
//! 5. Quantize each cell to 16 levels and concatenate as hex
//!
//! Every filter stage uses the edge-replicate border policy (out of
//! range coordinates clamp to the nearest pixel) and saturates its
//! output to 0-255, rounding ties away from zero, the same as an 8-bit
//! filter would.
//!
//! Box filtering followed by subsampling is evaluated only at the kept
//! sample points; the result is identical to filtering the whole image
//! and then subsampling.

use super::decode::ImageDecoder;
use super::quantize::{encode_levels, luminance, quantize_level};
use super::resize::CalibrationResizer;
use super::traits::{Algorithm, Extractor, Fingerprint};
use crate::error::FingerprintError;
use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cells per side of the fingerprint grid
pub const GRID_SIZE: u32 = 8;

/// Side length every image is resized to before filtering
pub const CALIBRATION_SIZE: u32 = 512;

/// Pixel layout the convolution runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Three channels, reduced to luminance only at quantization
    Rgb,
    /// One BT.601 luma channel
    Luma,
}

/// A rectangular correlation kernel with odd side lengths
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    ///
    /// Returns `None` unless both sides are odd and the weight count
    /// matches.
    pub fn new(width: usize, height: usize, weights: Vec<f64>) -> Option<Self> {
        let valid = width % 2 == 1 && height % 2 == 1 && weights.len() == width * height;
        valid.then_some(Self {
            width,
            height,
            weights,
        })
    }

    fn from_rows<const N: usize>(rows: [[f64; N]; N]) -> Self {
        Self {
            width: N,
            height: N,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// Normalised box-average kernel
    pub fn box_average(width: usize, height: usize) -> Self {
        let width = width.max(1) | 1;
        let height = height.max(1) | 1;
        let weight = 1.0 / (width * height) as f64;
        Self {
            width,
            height,
            weights: vec![weight; width * height],
        }
    }

    /// Horizontal Sobel gradient
    pub fn horizontal_gradient() -> Self {
        Self::from_rows([[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]])
    }

    /// 3x3 unsharp kernel
    pub fn sharpen() -> Self {
        Self::from_rows([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Sampling geometry that collapses an image to a `GRID_SIZE` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub stride_x: usize,
    pub stride_y: usize,
    pub kernel_width: usize,
    pub kernel_height: usize,
}

impl GridGeometry {
    /// Derive stride and box size from the image dimensions.
    ///
    /// The stride is `dimension / GRID_SIZE` so that exactly
    /// `GRID_SIZE` samples fit from offset 0; the box side is the
    /// stride rounded up to the next odd number so it stays centred.
    pub fn for_dimensions(width: u32, height: u32) -> Option<Self> {
        if width < GRID_SIZE || height < GRID_SIZE {
            return None;
        }
        let stride_x = (width / GRID_SIZE) as usize;
        let stride_y = (height / GRID_SIZE) as usize;
        Some(Self {
            stride_x,
            stride_y,
            kernel_width: (stride_x / 2) * 2 + 1,
            kernel_height: (stride_y / 2) * 2 + 1,
        })
    }

    pub fn kernel(&self) -> Kernel {
        Kernel::box_average(self.kernel_width, self.kernel_height)
    }
}

/// One 8-bit channel of an image
#[derive(Debug, Clone)]
struct Plane {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Plane {
    fn at(&self, x: isize, y: isize) -> u8 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.pixels[y * self.width + x]
    }

    /// Correlate the kernel centred on (x, y), saturated to 8 bits
    fn filter_at(&self, kernel: &Kernel, x: usize, y: usize) -> u8 {
        let half_w = (kernel.width / 2) as isize;
        let half_h = (kernel.height / 2) as isize;
        let mut sum = 0.0;

        for ky in 0..kernel.height {
            let sy = y as isize + ky as isize - half_h;
            let row = &kernel.weights[ky * kernel.width..(ky + 1) * kernel.width];
            for (kx, weight) in row.iter().enumerate() {
                if *weight == 0.0 {
                    continue;
                }
                let sx = x as isize + kx as isize - half_w;
                sum += weight * f64::from(self.at(sx, sy));
            }
        }

        sum.round().clamp(0.0, 255.0) as u8
    }

    /// Same-size filtering
    fn filter(&self, kernel: &Kernel) -> Plane {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(self.filter_at(kernel, x, y));
            }
        }
        Plane {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Filter with the grid's box kernel at the kept sample points only
    fn collapse(&self, geometry: &GridGeometry) -> Vec<u8> {
        let kernel = geometry.kernel();
        let mut cells = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
        for row in 0..GRID_SIZE as usize {
            for col in 0..GRID_SIZE as usize {
                cells.push(self.filter_at(&kernel, col * geometry.stride_x, row * geometry.stride_y));
            }
        }
        cells
    }
}

/// One instantiation of the convolution fingerprint
#[derive(Debug, Clone)]
pub struct ConvolutionConfig {
    algorithm: Algorithm,
    prefilter: Option<Kernel>,
    channels: ChannelMode,
}

impl ConvolutionConfig {
    pub fn blur() -> Self {
        Self {
            algorithm: Algorithm::Blur,
            prefilter: None,
            channels: ChannelMode::Rgb,
        }
    }

    pub fn edge() -> Self {
        Self {
            algorithm: Algorithm::Edge,
            prefilter: Some(Kernel::horizontal_gradient()),
            channels: ChannelMode::Rgb,
        }
    }

    pub fn sharpen() -> Self {
        Self {
            algorithm: Algorithm::Sharpen,
            prefilter: Some(Kernel::sharpen()),
            channels: ChannelMode::Rgb,
        }
    }

    pub fn gray_blur() -> Self {
        Self {
            algorithm: Algorithm::GrayBlur,
            prefilter: None,
            channels: ChannelMode::Luma,
        }
    }

    /// Configuration for a convolution algorithm, `None` for the others
    pub fn for_algorithm(algorithm: Algorithm) -> Option<Self> {
        match algorithm {
            Algorithm::Blur => Some(Self::blur()),
            Algorithm::Edge => Some(Self::edge()),
            Algorithm::Sharpen => Some(Self::sharpen()),
            Algorithm::GrayBlur => Some(Self::gray_blur()),
            Algorithm::Exact | Algorithm::Perceptual => None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn channels(&self) -> ChannelMode {
        self.channels
    }
}

/// Extractor computing one convolution configuration
pub struct ConvolutionHasher {
    config: ConvolutionConfig,
    calibration_size: u32,
}

impl ConvolutionHasher {
    pub fn new(config: ConvolutionConfig) -> Self {
        Self {
            config,
            calibration_size: CALIBRATION_SIZE,
        }
    }

    /// Override the calibration size (must be at least `GRID_SIZE`)
    pub fn with_calibration_size(mut self, size: u32) -> Self {
        self.calibration_size = size.max(GRID_SIZE);
        self
    }

    /// Compute the fingerprint of an already-decoded image
    pub fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, FingerprintError> {
        let mut resizer = CalibrationResizer::new();
        let size = self.calibration_size;

        let planes = match self.config.channels {
            ChannelMode::Rgb => {
                let rgb = resizer.resize_rgb(&image.to_rgb8(), size)?;
                split_channels(rgb.as_raw(), size as usize, 3)
            }
            ChannelMode::Luma => {
                let gray = resizer.resize_gray(&bt601_gray(image), size)?;
                split_channels(gray.as_raw(), size as usize, 1)
            }
        };

        let geometry = GridGeometry::for_dimensions(size, size).ok_or_else(|| {
            FingerprintError::Resize(format!("calibration size {} below grid size", size))
        })?;

        let cells: Vec<Vec<u8>> = planes
            .iter()
            .map(|plane| match &self.config.prefilter {
                Some(kernel) => plane.filter(kernel).collapse(&geometry),
                None => plane.collapse(&geometry),
            })
            .collect();

        let levels = (0..cells[0].len()).map(|i| match self.config.channels {
            ChannelMode::Rgb => quantize_level(luminance(cells[0][i], cells[1][i], cells[2][i])),
            ChannelMode::Luma => quantize_level(f64::from(cells[0][i])),
        });

        Ok(Fingerprint::new(self.config.algorithm, encode_levels(levels)))
    }
}

impl Extractor for ConvolutionHasher {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let image = ImageDecoder::decode(path)?;
        self.hash_image(&image)
    }

    fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }
}

/// BT.601 grayscale, rounded to the nearest level
fn bt601_gray(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luminance(r, g, b).round().clamp(0.0, 255.0) as u8])
    })
}

/// Split interleaved square pixel data into per-channel planes
fn split_channels(raw: &[u8], size: usize, channels: usize) -> Vec<Plane> {
    (0..channels)
        .map(|c| Plane {
            width: size,
            height: size,
            pixels: raw.iter().skip(c).step_by(channels).copied().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }

    /// Left half white, right half black
    fn split_image(size: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(size, size, |x, _| {
            if x < size / 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }))
    }

    fn all_configs() -> Vec<ConvolutionConfig> {
        vec![
            ConvolutionConfig::blur(),
            ConvolutionConfig::edge(),
            ConvolutionConfig::sharpen(),
            ConvolutionConfig::gray_blur(),
        ]
    }

    #[test]
    fn geometry_for_calibration_size() {
        let geometry = GridGeometry::for_dimensions(512, 512).unwrap();
        assert_eq!(geometry.stride_x, 64);
        assert_eq!(geometry.kernel_width, 65);
    }

    #[test]
    fn geometry_always_yields_eight_samples() {
        for (w, h) in [(8, 8), (100, 37), (513, 1000), (64, 64)] {
            let g = GridGeometry::for_dimensions(w, h).unwrap();
            assert!((GRID_SIZE as usize - 1) * g.stride_x < w as usize);
            assert!((GRID_SIZE as usize - 1) * g.stride_y < h as usize);
            assert_eq!(g.kernel_width % 2, 1);
            assert_eq!(g.kernel_height % 2, 1);
        }
        assert!(GridGeometry::for_dimensions(7, 100).is_none());
    }

    #[test]
    fn kernel_rejects_even_sides() {
        assert!(Kernel::new(2, 3, vec![0.0; 6]).is_none());
        assert!(Kernel::new(3, 3, vec![0.0; 8]).is_none());
        assert!(Kernel::new(3, 1, vec![1.0; 3]).is_some());
    }

    #[test]
    fn replicate_border_and_saturation() {
        let plane = Plane {
            width: 2,
            height: 2,
            pixels: vec![255, 0, 255, 0],
        };
        let filtered = plane.filter(&Kernel::horizontal_gradient());
        assert_eq!(filtered.pixels, vec![255, 255, 255, 255]);

        let reversed = Plane {
            width: 2,
            height: 2,
            pixels: vec![0, 255, 0, 255],
        };
        let filtered = reversed.filter(&Kernel::horizontal_gradient());
        assert_eq!(filtered.pixels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn fingerprints_are_64_lowercase_hex() {
        let image = split_image(200);
        for config in all_configs() {
            let fp = ConvolutionHasher::new(config).hash_image(&image).unwrap();
            assert_eq!(fp.value().len(), 64);
            assert!(fp
                .value()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn white_and_black_extremes() {
        for config in [ConvolutionConfig::blur(), ConvolutionConfig::sharpen(), ConvolutionConfig::gray_blur()] {
            let hasher = ConvolutionHasher::new(config);
            assert_eq!(hasher.hash_image(&solid(64, 64, 255)).unwrap().value(), "f".repeat(64));
            assert_eq!(hasher.hash_image(&solid(64, 64, 0)).unwrap().value(), "0".repeat(64));
        }
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let hasher = ConvolutionHasher::new(ConvolutionConfig::edge());
        let fp = hasher.hash_image(&solid(90, 60, 180)).unwrap();
        assert_eq!(fp.value(), "0".repeat(64));
    }

    #[test]
    fn edge_sees_the_boundary() {
        let hasher = ConvolutionHasher::new(ConvolutionConfig::edge());
        let fp = hasher.hash_image(&split_image(128)).unwrap();
        assert_ne!(fp.value(), "0".repeat(64));
    }

    #[test]
    fn blur_grid_follows_layout_row_major() {
        let hasher = ConvolutionHasher::new(ConvolutionConfig::blur());
        let fp = hasher.hash_image(&split_image(256)).unwrap();
        let rows: Vec<&str> = (0..8).map(|r| &fp.value()[r * 8..r * 8 + 8]).collect();

        assert!(rows.iter().all(|row| *row == rows[0]));
        assert!(rows[0].starts_with('f'));
        assert!(rows[0].ends_with('0'));
    }

    #[test]
    fn result_is_independent_of_input_resolution() {
        let hasher = ConvolutionHasher::new(ConvolutionConfig::gray_blur());
        let small = hasher.hash_image(&solid(40, 30, 120)).unwrap();
        let large = hasher.hash_image(&solid(1024, 768, 120)).unwrap();
        assert_eq!(small, large);
    }

    #[test]
    fn repeated_hashing_is_deterministic() {
        let image = split_image(150);
        for config in all_configs() {
            let hasher = ConvolutionHasher::new(config);
            assert_eq!(hasher.hash_image(&image).unwrap(), hasher.hash_image(&image).unwrap());
        }
    }

    #[test]
    fn configs_map_to_algorithms() {
        assert_eq!(
            ConvolutionConfig::for_algorithm(Algorithm::GrayBlur).unwrap().channels(),
            ChannelMode::Luma
        );
        assert!(ConvolutionConfig::for_algorithm(Algorithm::Exact).is_none());
        assert!(ConvolutionConfig::for_algorithm(Algorithm::Perceptual).is_none());
    }

    #[test]
    fn smaller_calibration_still_yields_full_grid() {
        let hasher = ConvolutionHasher::new(ConvolutionConfig::blur()).with_calibration_size(64);
        let fp = hasher.hash_image(&split_image(300)).unwrap();
        assert_eq!(fp.value().len(), 64);
    }
}
