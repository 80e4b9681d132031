//! # Core Module
//!
//! The GUI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - Lists the images in a directory
//! - `fingerprint` - Computes one fingerprint per image per algorithm
//! - `index` - Buckets images sharing a fingerprint
//! - `cluster` - Priority-ordered, claim-aware grouping
//! - `skip` - Reviewer exemptions
//! - `report` - Display records and the joined-name report
//! - `session` - Orchestrates the build-once, refilter-often workflow

pub mod cluster;
pub mod fingerprint;
pub mod index;
pub mod report;
pub mod scanner;
pub mod session;
pub mod skip;

// Re-export commonly used types
pub use cluster::{ClaimedSet, DuplicateGroup};
pub use fingerprint::{Algorithm, Fingerprint};
pub use index::FingerprintIndex;
pub use report::Report;
pub use session::{Session, SessionConfig};
pub use skip::SkipRegistry;
