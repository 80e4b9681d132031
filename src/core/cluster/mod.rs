//! # Cluster Module
//!
//! Turns per-algorithm buckets into duplicate groups.
//!
//! ## How It Works
//! Algorithms are visited from most to least trusted. Within one
//! algorithm, each bucket of two or more images is reduced to the
//! members no earlier group has claimed. If at least two remain, the
//! first becomes the original, the rest its duplicates, and all of
//! them are claimed. Claims carry over to the next algorithm, so a
//! pair explained by a byte digest is never reported again by a visual
//! heuristic.

mod claimed;

pub use claimed::ClaimedSet;

use crate::core::fingerprint::{Algorithm, Fingerprint};
use crate::core::index::FingerprintIndex;
use crate::events::{ClusterEvent, Event, EventSender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// One original and the images that duplicate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Algorithm whose collision formed the group
    pub algorithm: Algorithm,
    /// Shared fingerprint
    pub fingerprint: Fingerprint,
    /// Member kept as the reference copy
    pub original: PathBuf,
    /// Remaining members, never empty
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of duplicates (excluding the original)
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// All members, original first
    pub fn members(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.original).chain(self.duplicates.iter())
    }
}

/// Groups produced by one clustering pass
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    /// Groups in formation order (priority, then bucket order)
    pub groups: Vec<DuplicateGroup>,
    /// Every image claimed by a group
    pub claimed: ClaimedSet,
}

impl Clustering {
    /// Groups formed by one algorithm
    pub fn groups_for(&self, algorithm: Algorithm) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(move |g| g.algorithm == algorithm)
    }
}

/// Run one priority-ordered clustering pass.
///
/// `claimed` is extended with every image placed in a group; pass an
/// empty set to start a fresh pass.
pub fn cluster_once(
    index: &FingerprintIndex,
    claimed: &mut ClaimedSet,
    events: &EventSender,
) -> Vec<DuplicateGroup> {
    let mut groups = Vec::new();

    for algorithm_index in index.iter() {
        let algorithm = algorithm_index.algorithm();
        let before = groups.len();

        for bucket in algorithm_index.collisions() {
            let mut remainder = claimed.unclaimed(&bucket.members);
            if remainder.len() < 2 {
                continue;
            }

            claimed.claim_all(&remainder);
            let original = remainder.remove(0);

            events.send(Event::Cluster(ClusterEvent::GroupFormed {
                algorithm,
                original: original.clone(),
                duplicates: remainder.len(),
            }));

            groups.push(DuplicateGroup {
                algorithm,
                fingerprint: bucket.fingerprint.clone(),
                original,
                duplicates: remainder,
            });
        }

        debug!(%algorithm, groups = groups.len() - before, claimed = claimed.len(), "clustered");
    }

    events.send(Event::Cluster(ClusterEvent::Completed {
        total_groups: groups.len(),
        claimed: claimed.len(),
    }));

    groups
}

/// Run a fresh pass with an empty claimed set
pub fn cluster(index: &FingerprintIndex, events: &EventSender) -> Clustering {
    let mut claimed = ClaimedSet::new();
    let groups = cluster_once(index, &mut claimed, events);
    Clustering { groups, claimed }
}
