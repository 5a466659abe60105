//! Registry error types

use thiserror::Error;

/// Errors that can occur while building or using the registry
///
/// Resolution itself never fails.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Configuration error (threshold outside [0, 1])
    #[error("Configuration error: {0}")]
    Config(String),

    /// No entry owns the given folder name
    #[error("Unknown entry: {0}")]
    UnknownEntry(String),
}
