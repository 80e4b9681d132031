//! # Index Module
//!
//! Per-algorithm buckets of images sharing a fingerprint.
//!
//! ## Ordering
//! Buckets keep the order in which their fingerprint was first seen and
//! members keep the enumeration order of the input. Nothing is sorted:
//! the first member of a bucket is the candidate original when groups
//! are formed.
//!
//! ## Failures
//! An image the extractor cannot handle is recorded as an
//! [`ExtractionFailure`] and left out of that algorithm's index only.

use crate::core::fingerprint::{Algorithm, Extractor, Fingerprint};
use crate::events::{Event, EventSender, FingerprintEvent, FingerprintProgress};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Images sharing one fingerprint, in enumeration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub fingerprint: Fingerprint,
    pub members: Vec<PathBuf>,
}

impl Bucket {
    /// Whether more than one image produced this fingerprint
    pub fn is_collision(&self) -> bool {
        self.members.len() >= 2
    }
}

/// An image an extractor could not fingerprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub algorithm: Algorithm,
    pub path: PathBuf,
    pub reason: String,
}

/// All buckets for one algorithm
#[derive(Debug, Clone)]
pub struct AlgorithmIndex {
    algorithm: Algorithm,
    buckets: Vec<Bucket>,
    positions: HashMap<Fingerprint, usize>,
    indexed: HashSet<PathBuf>,
    failures: Vec<ExtractionFailure>,
}

impl AlgorithmIndex {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            buckets: Vec::new(),
            positions: HashMap::new(),
            indexed: HashSet::new(),
            failures: Vec::new(),
        }
    }

    /// Append an image to the bucket of its fingerprint.
    ///
    /// Returns `false` (and changes nothing) if the image is already
    /// indexed, so an image never lands in two buckets.
    pub fn insert(&mut self, path: &Path, fingerprint: Fingerprint) -> bool {
        if !self.indexed.insert(path.to_path_buf()) {
            return false;
        }

        match self.positions.get(&fingerprint) {
            Some(&position) => self.buckets[position].members.push(path.to_path_buf()),
            None => {
                self.positions.insert(fingerprint.clone(), self.buckets.len());
                self.buckets.push(Bucket {
                    fingerprint,
                    members: vec![path.to_path_buf()],
                });
            }
        }
        true
    }

    /// Record that an image could not be fingerprinted
    pub fn record_failure(&mut self, path: &Path, reason: String) {
        self.failures.push(ExtractionFailure {
            algorithm: self.algorithm,
            path: path.to_path_buf(),
            reason,
        });
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Buckets in first-seen order
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Buckets holding at least two images
    pub fn collisions(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(|b| b.is_collision())
    }

    pub fn failures(&self) -> &[ExtractionFailure] {
        &self.failures
    }

    /// Number of images that made it into the index
    pub fn indexed_count(&self) -> usize {
        self.indexed.len()
    }

    /// Bucket containing the given fingerprint
    pub fn bucket_for(&self, fingerprint: &Fingerprint) -> Option<&Bucket> {
        self.positions.get(fingerprint).map(|&i| &self.buckets[i])
    }
}

/// Indices for every enabled algorithm, highest trust first
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    indices: Vec<AlgorithmIndex>,
}

impl FingerprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an algorithm's index, keeping priority order.
    ///
    /// An existing index for the same algorithm is replaced.
    pub fn insert(&mut self, index: AlgorithmIndex) {
        self.indices.retain(|existing| existing.algorithm != index.algorithm);
        let position = self
            .indices
            .partition_point(|existing| existing.algorithm < index.algorithm);
        self.indices.insert(position, index);
    }

    /// Indices in priority order
    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmIndex> {
        self.indices.iter()
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&AlgorithmIndex> {
        self.indices.iter().find(|index| index.algorithm == algorithm)
    }

    pub fn algorithms(&self) -> Vec<Algorithm> {
        self.indices.iter().map(|index| index.algorithm).collect()
    }

    /// Every extraction failure across algorithms
    pub fn failures(&self) -> impl Iterator<Item = &ExtractionFailure> {
        self.indices.iter().flat_map(|index| index.failures.iter())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Fingerprint every image with one extractor.
///
/// Images are processed in the given order. A failing image is recorded
/// and skipped; the rest are still indexed.
pub fn build_index(images: &[PathBuf], extractor: &dyn Extractor, events: &EventSender) -> AlgorithmIndex {
    let algorithm = extractor.algorithm();
    let total = images.len();
    let mut index = AlgorithmIndex::new(algorithm);

    events.send(Event::Fingerprint(FingerprintEvent::Started {
        algorithm,
        total_images: total,
    }));

    for (i, path) in images.iter().enumerate() {
        match extractor.fingerprint(path) {
            Ok(fingerprint) => {
                if !index.insert(path, fingerprint) {
                    debug!(%algorithm, path = %path.display(), "image listed twice, indexed once");
                }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(%algorithm, path = %path.display(), error = %reason, "fingerprint failed");
                events.send(Event::Fingerprint(FingerprintEvent::Failed {
                    algorithm,
                    path: path.clone(),
                    message: reason.clone(),
                }));
                index.record_failure(path, reason);
            }
        }

        events.send(Event::Fingerprint(FingerprintEvent::Progress(FingerprintProgress {
            algorithm,
            completed: i + 1,
            total,
            current_path: path.clone(),
        })));
    }

    events.send(Event::Fingerprint(FingerprintEvent::Completed {
        algorithm,
        indexed: index.indexed_count(),
        buckets: index.buckets.len(),
        failures: index.failures.len(),
    }));

    debug!(
        %algorithm,
        indexed = index.indexed_count(),
        buckets = index.buckets.len(),
        collisions = index.collisions().count(),
        "index built"
    );

    index
}
