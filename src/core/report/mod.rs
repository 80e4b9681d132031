//! # Report Module
//!
//! Display records for one render of the session.
//!
//! Besides the per-algorithm groups, a report collects the base name of
//! every reported duplicate and joins them with `|`. Bulk tools can use
//! that string directly, or the anchored [`Report::selection_pattern`]
//! which escapes each name so it matches literally.

mod names;

pub use names::base_name;

use crate::core::fingerprint::Algorithm;
use crate::core::index::ExtractionFailure;
use crate::core::skip::FilteredGroup;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Groups of one algorithm after exemptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmSection {
    pub algorithm: Algorithm,
    pub groups: Vec<FilteredGroup>,
}

/// One original/duplicate pair to show side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPair {
    pub algorithm: Algorithm,
    pub original: PathBuf,
    pub duplicate: PathBuf,
    /// Base name of the duplicate
    pub name: String,
}

/// Everything a front end needs to render one pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// One section per enabled algorithm, priority order
    pub sections: Vec<AlgorithmSection>,
    /// Pairs in render order
    pub pairs: Vec<DisplayPair>,
    /// Base names of all reported duplicates, render order
    pub duplicate_names: Vec<String>,
    /// Images that some algorithm could not fingerprint
    pub failures: Vec<ExtractionFailure>,
}

impl Report {
    /// Build a report from filtered groups.
    ///
    /// `algorithms` lists the enabled algorithms in priority order so
    /// that algorithms without groups still get an (empty) section.
    pub fn from_groups(
        algorithms: &[Algorithm],
        groups: Vec<FilteredGroup>,
        failures: Vec<ExtractionFailure>,
    ) -> Self {
        let mut sections: Vec<AlgorithmSection> = algorithms
            .iter()
            .map(|&algorithm| AlgorithmSection {
                algorithm,
                groups: Vec::new(),
            })
            .collect();
        let mut pairs = Vec::new();
        let mut duplicate_names = Vec::new();

        for group in groups {
            for duplicate in &group.duplicates {
                let name = base_name(duplicate);
                duplicate_names.push(name.clone());
                pairs.push(DisplayPair {
                    algorithm: group.algorithm,
                    original: group.original.clone(),
                    duplicate: duplicate.clone(),
                    name,
                });
            }

            match sections.iter_mut().find(|s| s.algorithm == group.algorithm) {
                Some(section) => section.groups.push(group),
                None => sections.push(AlgorithmSection {
                    algorithm: group.algorithm,
                    groups: vec![group],
                }),
            }
        }

        Self {
            sections,
            pairs,
            duplicate_names,
            failures,
        }
    }

    /// Number of reported duplicates across all algorithms
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_names.len()
    }

    /// Number of groups still shown
    pub fn group_count(&self) -> usize {
        self.sections.iter().map(|s| s.groups.len()).sum()
    }

    /// Groups of one algorithm
    pub fn section(&self, algorithm: Algorithm) -> Option<&AlgorithmSection> {
        self.sections.iter().find(|s| s.algorithm == algorithm)
    }

    /// All reported base names joined with `|`
    pub fn joined_names(&self) -> String {
        self.duplicate_names.join("|")
    }

    /// Anchored alternation matching exactly the reported names
    pub fn selection_pattern(&self) -> String {
        let escaped: Vec<String> = self.duplicate_names.iter().map(|n| regex::escape(n)).collect();
        format!("^({})$", escaped.join("|"))
    }

    /// Compiled form of [`Report::selection_pattern`]
    pub fn selection_regex(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.selection_pattern())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered(algorithm: Algorithm, original: &str, duplicates: &[&str]) -> FilteredGroup {
        FilteredGroup {
            algorithm,
            original: PathBuf::from(original),
            duplicates: duplicates.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn pairs_and_names_follow_group_order() {
        let report = Report::from_groups(
            &[Algorithm::Exact, Algorithm::Blur],
            vec![
                filtered(Algorithm::Exact, "/img/a.png", &["/img/b.png", "/img/c.png"]),
                filtered(Algorithm::Blur, "/img/d.png", &["/img/e.png"]),
            ],
            Vec::new(),
        );

        assert_eq!(report.duplicate_names, vec!["b.png", "c.png", "e.png"]);
        assert_eq!(report.duplicate_count(), 3);
        assert_eq!(report.group_count(), 2);
        assert_eq!(report.pairs[2].original, PathBuf::from("/img/d.png"));
        assert_eq!(report.joined_names(), "b.png|c.png|e.png");
    }

    #[test]
    fn enabled_algorithms_without_groups_get_empty_sections() {
        let report = Report::from_groups(&[Algorithm::Exact, Algorithm::Perceptual], Vec::new(), Vec::new());
        assert_eq!(report.sections.len(), 2);
        assert!(report.section(Algorithm::Perceptual).unwrap().groups.is_empty());
        assert!(report.is_empty());
        assert_eq!(report.joined_names(), "");
    }

    #[test]
    fn selection_pattern_matches_names_literally() {
        let report = Report::from_groups(
            &[Algorithm::Exact],
            vec![filtered(Algorithm::Exact, "/a.png", &["/copy (1).png", "/b+c.jpg"])],
            Vec::new(),
        );

        let regex = report.selection_regex().unwrap();
        assert!(regex.is_match("copy (1).png"));
        assert!(regex.is_match("b+c.jpg"));
        assert!(!regex.is_match("bbc.jpg"));
        assert!(!regex.is_match("a.png"));
    }
}
