//! Docsort Registry
//!
//! Maps raw company names to canonical entries, each owning one folder
//! under the output root.
//!
//! The registry provides:
//! - Placeholder routing ("", "unknown", "null" go to `Unknown`)
//! - Alias lookup on the normalized key
//! - Fuzzy matching against existing entries above a threshold
//! - Entry creation with a sanitized folder name
//! - Per-entry file counts and aggregate statistics
//!
//! # Examples
//!
//! ```
//! use docsort_registry::{CanonicalRegistry, RegistryConfig};
//!
//! let config = RegistryConfig::default();
//! let mut registry = CanonicalRegistry::new(config, "/srv/documents").unwrap();
//!
//! let resolution = registry.resolve("BANK_OF_AMERICA");
//! assert_eq!(resolution.entry.canonical_name, "BANK OF AMERICA");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod registry;
mod shared;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use registry::{CanonicalRegistry, MatchKind, RegistryStatistics, Resolution};
pub use shared::SharedRegistry;
