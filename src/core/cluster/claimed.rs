//! Running set of images already explained by a group.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Images claimed by a group during one clustering pass.
///
/// Only grows; a fresh pass starts from a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedSet {
    images: HashSet<PathBuf>,
}

impl ClaimedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, image: &Path) -> bool {
        self.images.contains(image)
    }

    /// Members not yet claimed, order preserved
    pub fn unclaimed(&self, members: &[PathBuf]) -> Vec<PathBuf> {
        members
            .iter()
            .filter(|m| !self.images.contains(m.as_path()))
            .cloned()
            .collect()
    }

    pub fn claim_all(&mut self, images: &[PathBuf]) {
        self.images.extend(images.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
