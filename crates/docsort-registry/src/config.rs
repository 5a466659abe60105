//! Registry configuration

use crate::RegistryError;
use docsort_domain::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Configuration for name resolution
///
/// # Examples
///
/// ```
/// use docsort_registry::RegistryConfig;
///
/// let config = RegistryConfig::default();
/// assert!(config.enable_normalization);
/// assert_eq!(config.similarity_threshold, 0.75);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Match names by normalized key and fuzzy similarity
    ///
    /// When disabled every distinct literal name gets its own entry.
    /// Default: true
    #[serde(default = "default_enable_normalization")]
    pub enable_normalization: bool,

    /// Minimum composite similarity (0.0-1.0) for two names to match
    /// Default: 0.75
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_enable_normalization() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enable_normalization: true,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl RegistryConfig {
    /// Fewer, safer matches (threshold 0.85)
    pub fn strict() -> Self {
        Self {
            enable_normalization: true,
            similarity_threshold: 0.85,
        }
    }

    /// More aggressive matching (threshold 0.65)
    pub fn lenient() -> Self {
        Self {
            enable_normalization: true,
            similarity_threshold: 0.65,
        }
    }

    /// Exact literal matching only
    pub fn exact() -> Self {
        Self {
            enable_normalization: false,
            ..Self::default()
        }
    }

    /// Reject thresholds outside [0, 1]
    pub fn validate(&self) -> Result<(), RegistryError> {
        validate_threshold(self.similarity_threshold)
            .map(|_| ())
            .map_err(RegistryError::Config)
    }
}
