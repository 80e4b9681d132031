//! Flat directory listing using walkdir.

use super::filter::ImageFilter;
use super::{ScanIssue, ScanResult};
use crate::error::ConfigError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory lister
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to include hidden files
    pub include_hidden: bool,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// Lists the images directly inside one directory.
///
/// Entries come back in the order the filesystem reports them; they are
/// never sorted, since that order decides which member of a duplicate
/// group is treated as the original.
pub struct DirectoryLister {
    filter: ImageFilter,
}

impl DirectoryLister {
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);
        if let Some(extensions) = config.extensions {
            filter = filter.with_extensions(extensions);
        }
        Self { filter }
    }

    /// List without progress events
    pub fn list(&self, root: &Path) -> Result<ScanResult, ConfigError> {
        self.list_with_events(root, &null_sender())
    }

    /// List a directory, reporting found images and unreadable entries
    pub fn list_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ConfigError> {
        if !root.exists() {
            return Err(ConfigError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        // walkdir reports an unreadable root as an entry error; surface
        // it as fatal before listing starts.
        std::fs::read_dir(root).map_err(|source| ConfigError::ReadDirectory {
            path: root.to_path_buf(),
            source,
        })?;

        events.send(Event::Scan(ScanEvent::Started {
            path: root.to_path_buf(),
        }));

        let mut images = Vec::new();
        let mut issues = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let path = entry.into_path();
                    if !self.filter.should_include(&path) {
                        debug!(path = %path.display(), "skipping non-image entry");
                        continue;
                    }
                    events.send(Event::Scan(ScanEvent::ImageFound { path: path.clone() }));
                    images.push(path);
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let message = e.to_string();
                    warn!(path = %path.display(), error = %message, "unreadable directory entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path: path.clone(),
                        message: message.clone(),
                    }));
                    issues.push(ScanIssue { path, message });
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: images.len(),
        }));

        Ok(ScanResult { images, issues })
    }
}
