//! Perceptual Hash (pHash).
//!
//! pHash runs a Discrete Cosine Transform over a downscaled grayscale
//! image and keeps one bit per low-frequency coefficient, which makes
//! it stable under:
//! - Scaling
//! - Recompression
//! - Small brightness changes
//!
//! The transform itself comes from the image_hasher crate. Here only
//! its contract matters: deterministic, fixed length, and compared by
//! exact equality.

use super::decode::ImageDecoder;
use super::traits::{Algorithm, Extractor, Fingerprint};
use crate::error::FingerprintError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig};
use std::path::Path;

/// Bits per side of the pHash grid
const HASH_SIZE: u32 = 8;

/// DCT perceptual hash extractor
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    pub fn new() -> Self {
        let hasher = HasherConfig::new()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }

    /// Compute the fingerprint of an already-decoded image
    pub fn hash_image(&self, image: &DynamicImage) -> Fingerprint {
        let hash = self.hasher.hash_image(image);
        let value: String = hash.as_bytes().iter().map(|b| format!("{:02x}", b)).collect();
        Fingerprint::new(Algorithm::Perceptual, value)
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PerceptualHasher {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let image = ImageDecoder::decode(path)?;
        Ok(self.hash_image(&image))
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Perceptual
    }
}
