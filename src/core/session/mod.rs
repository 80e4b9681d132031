//! # Session Module
//!
//! Orchestrates one review session over a fixed list of images.
//!
//! ## Stages
//! 1. **Fingerprint** - build one index per enabled algorithm
//! 2. **Cluster** - priority-ordered, claim-aware grouping
//! 3. **Filter** - hide the reviewer's skipped images
//!
//! Stages 1 and 2 are expensive and run once per session (or after an
//! explicit [`Session::reset`]). Stage 3 is re-run on every render, so
//! a [`Session::skip`] is visible on the very next [`Session::refilter`]
//! without touching any image again.

mod config;

pub use config::SessionConfig;

use crate::core::cluster::{cluster, Clustering};
use crate::core::fingerprint::{extractor_for, Algorithm};
use crate::core::index::{build_index, FingerprintIndex};
use crate::core::report::Report;
use crate::core::scanner::DirectoryLister;
use crate::core::skip::SkipRegistry;
use crate::error::{ConfigError, SessionError};
use crate::events::{null_sender, Event, EventSender, SessionEvent, SessionPhase, SessionSummary};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Output of the expensive stages, kept until reset
#[derive(Debug)]
struct BuiltState {
    index: FingerprintIndex,
    clustering: Clustering,
}

/// A cached duplicate-finding session
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    images: Vec<PathBuf>,
    skips: SkipRegistry,
    built: Option<BuiltState>,
    events: EventSender,
}

impl Session {
    /// Create a session over an explicit image list.
    ///
    /// The order of `images` is kept; it decides which member of a
    /// group is the original.
    pub fn new(images: Vec<PathBuf>, config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if images.is_empty() {
            return Err(ConfigError::NoImages);
        }

        Ok(Self {
            config,
            images,
            skips: SkipRegistry::new(),
            built: None,
            events: null_sender(),
        })
    }

    /// Create a session over the images directly inside `dir`
    pub fn from_directory(dir: &Path, config: SessionConfig) -> Result<Self, ConfigError> {
        Self::from_directory_with_events(dir, config, null_sender())
    }

    /// Like [`Session::from_directory`], reporting listing progress
    pub fn from_directory_with_events(
        dir: &Path,
        config: SessionConfig,
        events: EventSender,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let listing = DirectoryLister::new(config.scan_config().clone()).list_with_events(dir, &events)?;
        if listing.images.is_empty() {
            return Err(ConfigError::EmptyDirectory {
                path: dir.to_path_buf(),
            });
        }

        Ok(Self::new(listing.images, config)?.with_events(events))
    }

    /// Report progress through `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    /// Run the expensive stages unless they already ran.
    ///
    /// Returns `true` if fingerprints were computed by this call.
    pub fn build_if_needed(&mut self) -> bool {
        if self.built.is_some() {
            return false;
        }

        let start = Instant::now();
        let algorithms = self.config.enabled().to_vec();
        info!(images = self.images.len(), algorithms = algorithms.len(), "building fingerprints");

        self.events.send(Event::Session(SessionEvent::Started {
            total_images: self.images.len(),
        }));
        self.phase(SessionPhase::Fingerprinting);

        let mut index = FingerprintIndex::new();
        for algorithm in algorithms {
            let extractor = extractor_for(algorithm);
            index.insert(build_index(&self.images, extractor.as_ref(), &self.events));
        }

        self.phase(SessionPhase::Clustering);
        let clustering = cluster(&index, &self.events);

        let summary = SessionSummary {
            total_images: self.images.len(),
            duplicate_groups: clustering.groups.len(),
            claimed_images: clustering.claimed.len(),
            failures: index.failures().count(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            groups = summary.duplicate_groups,
            claimed = summary.claimed_images,
            failures = summary.failures,
            duration_ms = summary.duration_ms,
            "fingerprints built"
        );
        self.events.send(Event::Session(SessionEvent::Completed { summary }));

        self.built = Some(BuiltState { index, clustering });
        true
    }

    /// Build if needed, then render with current exemptions
    pub fn run_once(&mut self) -> Report {
        self.build_if_needed();
        match &self.built {
            Some(built) => self.render(built),
            None => Report::default(),
        }
    }

    /// Re-apply exemptions to the stored groups without re-extracting
    pub fn refilter(&self) -> Result<Report, SessionError> {
        let built = self.built.as_ref().ok_or(SessionError::NotBuilt)?;
        Ok(self.render(built))
    }

    /// Exempt an image from display. Returns `true` if it was new.
    pub fn skip(&mut self, image: impl Into<PathBuf>) -> bool {
        let image = image.into();
        let added = self.skips.skip(image.clone());
        if added {
            self.events.send(Event::Session(SessionEvent::Skipped { path: image }));
        }
        added
    }

    /// Drop fingerprints and groups; the next run re-extracts.
    ///
    /// Exemptions are kept.
    pub fn reset(&mut self) {
        if self.built.take().is_some() {
            self.events.send(Event::Session(SessionEvent::Reset));
        }
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        self.config.enabled()
    }

    pub fn skips(&self) -> &SkipRegistry {
        &self.skips
    }

    /// Fingerprint indices, once built
    pub fn index(&self) -> Option<&FingerprintIndex> {
        self.built.as_ref().map(|b| &b.index)
    }

    /// Unfiltered clustering result, once built
    pub fn clustering(&self) -> Option<&Clustering> {
        self.built.as_ref().map(|b| &b.clustering)
    }

    fn render(&self, built: &BuiltState) -> Report {
        self.phase(SessionPhase::Filtering);

        let groups = built
            .clustering
            .groups
            .iter()
            .filter_map(|group| self.skips.filter(group))
            .collect();
        let failures = built.index.failures().cloned().collect();
        let report = Report::from_groups(self.config.enabled(), groups, failures);

        self.events.send(Event::Session(SessionEvent::Refiltered {
            reported_duplicates: report.duplicate_count(),
        }));
        report
    }

    fn phase(&self, phase: SessionPhase) {
        self.events.send(Event::Session(SessionEvent::PhaseChanged { phase }));
    }
}
