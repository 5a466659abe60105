//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use docsort_domain::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};
use docsort_merger::MergeConfig;
use docsort_registry::RegistryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one folder per company
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Name matching settings
    #[serde(default)]
    pub normalization: NormalizationSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Name matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationSettings {
    /// Fuzzy matching on normalized names
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum composite similarity for a match
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f64,

    /// Merge duplicate folders before resolving
    #[serde(default = "default_true")]
    pub auto_merge: bool,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(docsort_home()?.join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject an out-of-range threshold.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.normalization.similarity_threshold)
            .map(|_| ())
            .map_err(CliError::Config)
    }

    /// Apply one-run overrides from the command line.
    pub fn apply_overrides(
        &mut self,
        root: Option<PathBuf>,
        threshold: Option<f64>,
        disable_normalization: bool,
    ) -> Result<()> {
        if let Some(root) = root {
            self.output_root = root;
        }
        if let Some(threshold) = threshold {
            self.normalization.similarity_threshold = threshold;
        }
        if disable_normalization {
            self.normalization.enabled = false;
        }
        self.validate()
    }

    /// Registry settings derived from this configuration.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            enable_normalization: self.normalization.enabled,
            similarity_threshold: self.normalization.similarity_threshold,
        }
    }

    /// Merge pass settings derived from this configuration.
    ///
    /// Literal matching never merges folders at startup.
    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            similarity_threshold: self.normalization.similarity_threshold,
            auto_merge: self.normalization.enabled && self.normalization.auto_merge,
            ..MergeConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            normalization: NormalizationSettings::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            auto_merge: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

/// `~/.docsort`
pub fn docsort_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".docsort"))
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}
