//! # Skip Module
//!
//! Reviewer exemptions. A skipped image is hidden from displayed and
//! reported duplicate lists; it stays claimed, so it is never handed to
//! a lower-priority algorithm for regrouping.

use crate::core::cluster::DuplicateGroup;
use crate::core::fingerprint::Algorithm;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A group as it should be shown after exemptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredGroup {
    pub algorithm: Algorithm,
    pub original: PathBuf,
    pub duplicates: Vec<PathBuf>,
}

/// Images the reviewer marked as not-a-duplicate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkipRegistry {
    skipped: HashSet<PathBuf>,
}

impl SkipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exempt an image. Returns `true` the first time it is skipped.
    pub fn skip(&mut self, image: impl Into<PathBuf>) -> bool {
        self.skipped.insert(image.into())
    }

    pub fn is_skipped(&self, image: &Path) -> bool {
        self.skipped.contains(image)
    }

    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Drop skipped duplicates from a group.
    ///
    /// Returns `None` when no duplicate is left to show. The original is
    /// kept as-is even if it was skipped itself.
    pub fn filter(&self, group: &DuplicateGroup) -> Option<FilteredGroup> {
        let duplicates: Vec<PathBuf> = group
            .duplicates
            .iter()
            .filter(|d| !self.is_skipped(d))
            .cloned()
            .collect();

        if duplicates.is_empty() {
            return None;
        }

        Some(FilteredGroup {
            algorithm: group.algorithm,
            original: group.original.clone(),
            duplicates,
        })
    }
}
