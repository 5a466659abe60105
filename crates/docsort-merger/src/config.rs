//! Configuration for the startup merge pass

use crate::MergeError;
use docsort_domain::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Configuration for [`FolderMerger`](crate::FolderMerger)
///
/// # Examples
///
/// ```
/// use docsort_merger::MergeConfig;
///
/// // Default configuration: merge for real at 0.75
/// let config = MergeConfig::default();
/// assert!(config.auto_merge);
/// assert!(!config.dry_run);
///
/// // Report only
/// let config = MergeConfig::preview();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Minimum composite similarity for two folders to cluster
    /// Default: 0.75 (same as name resolution)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Cluster and merge duplicates; when false the pass only scans
    /// Default: true
    #[serde(default = "default_auto_merge")]
    pub auto_merge: bool,

    /// Dry-run mode: report what would move without touching the disk
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Ignore folders whose name starts with `.`
    /// Default: true
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_auto_merge() -> bool {
    true
}

fn default_skip_hidden() -> bool {
    true
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            auto_merge: true,
            dry_run: false,
            skip_hidden: true,
        }
    }
}

impl MergeConfig {
    /// Scan and report clusters without moving anything
    pub fn preview() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Scan only: no clustering, every folder is seeded as-is
    pub fn scan_only() -> Self {
        Self {
            auto_merge: false,
            ..Self::default()
        }
    }

    /// Use a different clustering threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Reject thresholds outside [0, 1]
    pub fn validate(&self) -> Result<(), MergeError> {
        validate_threshold(self.similarity_threshold)
            .map(|_| ())
            .map_err(MergeError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MergeConfig::default();
        assert_eq!(config.similarity_threshold, 0.75);
        assert!(config.auto_merge);
        assert!(!config.dry_run);
        assert!(config.skip_hidden);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert!(MergeConfig::preview().dry_run);
        assert!(!MergeConfig::scan_only().auto_merge);
        assert_eq!(MergeConfig::default().with_threshold(0.9).similarity_threshold, 0.9);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let config = MergeConfig::default().with_threshold(f64::NAN);
        assert!(matches!(config.validate(), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = MergeConfig::preview();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: MergeConfig = serde_json::from_str(&serialized).unwrap();
        assert!(deserialized.dry_run);
        assert_eq!(deserialized.similarity_threshold, config.similarity_threshold);

        let partial: MergeConfig = serde_json::from_str(r#"{"dry_run": true}"#).unwrap();
        assert!(partial.auto_merge);
        assert!(partial.skip_hidden);
    }
}
