//! # Error Module
//!
//! User-friendly error types for the duplicate finder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Contain per-image failures** - a broken image only drops out of
//!   the algorithm that failed on it
//! - **Fail fast on configuration** - a bad directory or an empty
//!   algorithm set aborts before any image is read

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors raised before extraction starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No images found in {path}")]
    EmptyDirectory { path: PathBuf },

    #[error("No images to check")]
    NoImages,

    #[error("At least one fingerprint algorithm must be enabled")]
    NoAlgorithmsEnabled,

    #[error("Unknown algorithm '{name}' (expected one of: {expected})")]
    UnknownAlgorithm { name: String, expected: String },
}

/// Per-image errors produced by an extractor
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Resize to calibration size failed: {0}")]
    Resize(String),
}

/// Errors from misusing the review session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Fingerprints have not been built yet; run the session first")]
    NotBuilt,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;
