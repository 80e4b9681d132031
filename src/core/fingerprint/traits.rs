//! Trait definitions for fingerprint extraction.

use crate::error::{ConfigError, FingerprintError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Available fingerprint algorithms.
///
/// Declaration order is trust priority: a collision under an earlier
/// variant is believed before one under a later variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Algorithm {
    /// SHA-256 of the raw file bytes
    Exact,
    /// DCT perceptual hash
    Perceptual,
    /// Box-averaged RGB brightness grid
    Blur,
    /// Horizontal-gradient RGB brightness grid
    Edge,
    /// Sharpened RGB brightness grid
    Sharpen,
    /// Box-averaged single-channel brightness grid
    GrayBlur,
}

impl Algorithm {
    /// Every algorithm, highest trust first
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Exact,
        Algorithm::Perceptual,
        Algorithm::Blur,
        Algorithm::Edge,
        Algorithm::Sharpen,
        Algorithm::GrayBlur,
    ];

    /// Short machine name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Exact => "exact",
            Algorithm::Perceptual => "perceptual",
            Algorithm::Blur => "blur",
            Algorithm::Edge => "edge",
            Algorithm::Sharpen => "sharpen",
            Algorithm::GrayBlur => "gray-blur",
        }
    }

    /// Human-readable description of what a collision means
    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Exact => "SHA-256 - files are byte-for-byte identical",
            Algorithm::Perceptual => "pHash - same DCT perceptual code",
            Algorithm::Blur => "Blur - same coarse colour brightness layout",
            Algorithm::Edge => "Edge - same horizontal gradient layout",
            Algorithm::Sharpen => "Sharpen - same sharpened brightness layout",
            Algorithm::GrayBlur => "Gray blur - same coarse grayscale layout",
        }
    }

    /// Whether this algorithm needs decoded pixels rather than raw bytes
    pub fn needs_decode(&self) -> bool {
        !matches!(self, Algorithm::Exact)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Exact => write!(f, "SHA256"),
            Algorithm::Perceptual => write!(f, "Perceptual Hash"),
            Algorithm::Blur => write!(f, "Convolution Hash"),
            Algorithm::Edge => write!(f, "Sobel Hash"),
            Algorithm::Sharpen => write!(f, "Sharpen Hash"),
            Algorithm::GrayBlur => write!(f, "Gray Convolution Hash"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownAlgorithm {
                name: s.to_string(),
                expected: Algorithm::ALL.map(|a| a.name()).join(", "),
            })
    }
}

/// An algorithm-tagged fingerprint value.
///
/// Equality includes the tag, so values from different algorithms
/// never compare equal even if their strings happen to match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    algorithm: Algorithm,
    value: String,
}

impl Fingerprint {
    /// Create a new fingerprint
    pub fn new(algorithm: Algorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }

    /// Algorithm that produced this fingerprint
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The fingerprint value as lowercase hex
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm.name(), self.value)
    }
}

/// Trait for fingerprint extractors
pub trait Extractor: Send + Sync {
    /// Compute the fingerprint of the image stored at `path`
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError>;

    /// The algorithm this extractor implements
    fn algorithm(&self) -> Algorithm;
}
