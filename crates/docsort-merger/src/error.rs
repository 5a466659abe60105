//! Error types for the merge pass

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a merge pass
///
/// Failures moving individual files are not errors; they are recorded
/// in the [`MergeReport`](crate::MergeReport).
#[derive(Error, Debug)]
pub enum MergeError {
    /// Configuration error (threshold outside [0, 1])
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output root could not be read
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.into(),
            source,
        }
    }
}
