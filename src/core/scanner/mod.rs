//! # Scanner Module
//!
//! Lists the images in a single directory (no recursion) and hands them
//! to the session in listing order.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - WebP (.webp)
//! - GIF (.gif)
//! - BMP (.bmp)
//! - TIFF (.tiff, .tif)
//!
//! ## Example
//! ```rust,ignore
//! use fingerprint_dedup::core::scanner::{DirectoryLister, ScanConfig};
//!
//! let lister = DirectoryLister::new(ScanConfig::default());
//! let listing = lister.list(Path::new("/Users/me/inbox"))?;
//! ```

mod filter;
mod lister;

pub use filter::ImageFilter;
pub use lister::{DirectoryLister, ScanConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An entry that could not be read while listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanIssue {
    pub path: PathBuf,
    pub message: String,
}

/// Result of listing a directory
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Images in listing order
    pub images: Vec<PathBuf>,
    /// Entries that could not be read (non-fatal)
    pub issues: Vec<ScanIssue>,
}
