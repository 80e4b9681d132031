//! Session configuration builder.

use crate::core::fingerprint::Algorithm;
use crate::core::scanner::ScanConfig;
use crate::error::ConfigError;

/// Which algorithms run and how the source directory is listed
#[derive(Debug, Clone)]
pub struct SessionConfig {
    algorithms: Vec<Algorithm>,
    scan: ScanConfig,
}

impl SessionConfig {
    /// All algorithms enabled, default listing
    pub fn new() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
            scan: ScanConfig::default(),
        }
    }

    /// Replace the enabled algorithm set
    pub fn algorithms(mut self, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self.normalize();
        self
    }

    /// Enable or disable a single algorithm
    pub fn enable(mut self, algorithm: Algorithm, enabled: bool) -> Self {
        if enabled {
            self.algorithms.push(algorithm);
        } else {
            self.algorithms.retain(|a| *a != algorithm);
        }
        self.normalize();
        self
    }

    /// Include hidden files when listing a directory
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.scan.include_hidden = include;
        self
    }

    /// Restrict listing to these extensions
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.scan.extensions = Some(extensions);
        self
    }

    /// Enabled algorithms, highest trust first
    pub fn enabled(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn is_enabled(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    /// Reject configurations that cannot produce any result
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithmsEnabled);
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.algorithms.sort();
        self.algorithms.dedup();
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything_in_priority_order() {
        let config = SessionConfig::new();
        assert_eq!(config.enabled(), &Algorithm::ALL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn algorithms_are_sorted_and_deduplicated() {
        let config = SessionConfig::new().algorithms([
            Algorithm::Sharpen,
            Algorithm::Exact,
            Algorithm::Sharpen,
        ]);
        assert_eq!(config.enabled(), &[Algorithm::Exact, Algorithm::Sharpen]);
    }

    #[test]
    fn toggling_single_algorithms() {
        let config = SessionConfig::new()
            .enable(Algorithm::Edge, false)
            .enable(Algorithm::Exact, true);
        assert!(!config.is_enabled(Algorithm::Edge));
        assert!(config.is_enabled(Algorithm::Exact));
        assert_eq!(config.enabled().len(), 5);
    }

    #[test]
    fn empty_algorithm_set_is_rejected() {
        let config = SessionConfig::new().algorithms([]);
        assert!(matches!(config.validate(), Err(ConfigError::NoAlgorithmsEnabled)));
    }
}
