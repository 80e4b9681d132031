//! # Fingerprint Dedup
//!
//! Finds duplicate and near-duplicate images by computing several
//! independent content fingerprints per image and grouping images that
//! collide under any of them.
//!
//! ## Core Philosophy
//! - **Exact matches only** - fingerprints either collide or they don't
//! - **Trust order** - a byte digest outranks visual heuristics
//! - **Never double-report** - an image explained once is not shown again
//! - **Reviewer has the last word** - skipped images are hidden, never re-grouped
//!
//! ## Architecture
//! - `core` - Fingerprinting, indexing, clustering and the review session
//! - `events` - Event-driven progress reporting (GUI-ready)
//! - `error` - User-friendly error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DedupError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// `RUST_LOG` takes precedence over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    // A second initialisation (tests, embedding apps) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
