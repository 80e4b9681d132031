//! Event type definitions for progress reporting.

use crate::core::fingerprint::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by a duplicate-finding session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory listing events
    Scan(ScanEvent),
    /// Per-algorithm fingerprinting events
    Fingerprint(FingerprintEvent),
    /// Clustering events
    Cluster(ClusterEvent),
    /// Session-level events
    Session(SessionEvent),
}

/// Events while listing the source directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Listing has started
    Started { path: PathBuf },
    /// An image was found
    ImageFound { path: PathBuf },
    /// An entry could not be read but listing continues
    Error { path: PathBuf, message: String },
    /// Listing completed
    Completed { total_images: usize },
}

/// Events while building one algorithm's index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FingerprintEvent {
    /// Fingerprinting has started for an algorithm
    Started { algorithm: Algorithm, total_images: usize },
    /// Progress update
    Progress(FingerprintProgress),
    /// An image failed this algorithm and was left out of its index
    Failed {
        algorithm: Algorithm,
        path: PathBuf,
        message: String,
    },
    /// Index for the algorithm is complete
    Completed {
        algorithm: Algorithm,
        indexed: usize,
        buckets: usize,
        failures: usize,
    },
}

/// Progress information during fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintProgress {
    /// Algorithm being computed
    pub algorithm: Algorithm,
    /// Images processed so far (including failures)
    pub completed: usize,
    /// Total images for this algorithm
    pub total: usize,
    /// Image just processed
    pub current_path: PathBuf,
}

/// Events while clustering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterEvent {
    /// A group was formed
    GroupFormed {
        algorithm: Algorithm,
        original: PathBuf,
        duplicates: usize,
    },
    /// Clustering completed
    Completed { total_groups: usize, claimed: usize },
}

/// Session-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A full pass has started
    Started { total_images: usize },
    /// Moving to a new phase
    PhaseChanged { phase: SessionPhase },
    /// A full pass completed
    Completed { summary: SessionSummary },
    /// Groups were filtered against the skip set again
    Refiltered { reported_duplicates: usize },
    /// An image was exempted by the reviewer
    Skipped { path: PathBuf },
    /// Built state was dropped
    Reset,
}

/// Phases of a full pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Fingerprinting,
    Clustering,
    Filtering,
}

/// Summary of a full pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Images considered
    pub total_images: usize,
    /// Groups formed across all algorithms
    pub duplicate_groups: usize,
    /// Images claimed by some group
    pub claimed_images: usize,
    /// Per-image extraction failures across all algorithms
    pub failures: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Fingerprinting => write!(f, "Fingerprinting"),
            SessionPhase::Clustering => write!(f, "Clustering"),
            SessionPhase::Filtering => write!(f, "Filtering"),
        }
    }
}
