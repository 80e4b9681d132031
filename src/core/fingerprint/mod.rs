//! # Fingerprint Module
//!
//! Maps one image to one fingerprint value per algorithm.
//!
//! ## Supported Algorithms (trust priority order)
//! - **Exact** - SHA-256 of the file bytes
//! - **Perceptual** - DCT pHash, robust to resizing and recompression
//! - **Blur / Edge / Sharpen / GrayBlur** - 8x8 grids of 16-level
//!   brightness after a convolution pass (see [`convolution`])
//!
//! All fingerprints are compared by exact equality; there is no
//! distance threshold.
//!
//! ## Example
//! ```rust,ignore
//! use fingerprint_dedup::core::fingerprint::{extractor_for, Algorithm};
//!
//! let extractor = extractor_for(Algorithm::Edge);
//! let fingerprint = extractor.fingerprint(&path)?;
//! ```

pub mod convolution;
mod decode;
mod exact;
mod perceptual;
pub mod quantize;
mod resize;
mod traits;

pub use convolution::{ChannelMode, ConvolutionConfig, ConvolutionHasher, Kernel};
pub use decode::ImageDecoder;
pub use exact::ExactDigest;
pub use perceptual::PerceptualHasher;
pub use resize::CalibrationResizer;
pub use traits::{Algorithm, Extractor, Fingerprint};

/// Build the extractor for an algorithm
pub fn extractor_for(algorithm: Algorithm) -> Box<dyn Extractor> {
    match algorithm {
        Algorithm::Exact => Box::new(ExactDigest::new()),
        Algorithm::Perceptual => Box::new(PerceptualHasher::new()),
        Algorithm::Blur => Box::new(ConvolutionHasher::new(ConvolutionConfig::blur())),
        Algorithm::Edge => Box::new(ConvolutionHasher::new(ConvolutionConfig::edge())),
        Algorithm::Sharpen => Box::new(ConvolutionHasher::new(ConvolutionConfig::sharpen())),
        Algorithm::GrayBlur => Box::new(ConvolutionHasher::new(ConvolutionConfig::gray_blur())),
    }
}
