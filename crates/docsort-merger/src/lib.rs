//! Docsort Merger
//!
//! One-shot startup pass that folds duplicate company folders together
//! before any new document is filed.
//!
//! # Overview
//!
//! The merger is responsible for:
//! - **Scanning**: listing the top-level folders of the output root with
//!   their recursive file counts
//! - **Clustering**: grouping folders whose names score at or above the
//!   similarity threshold (union-find, so grouping is transitive)
//! - **Merging**: moving every file of each losing folder into the winner,
//!   preserving subdirectories and renaming on collision (`name_1.ext`)
//! - **Seeding**: producing one [`CanonicalEntry`](docsort_domain::CanonicalEntry)
//!   per surviving folder for the registry
//!
//! ## Winner selection
//!
//! | Rule | Example |
//! |------|---------|
//! | More files wins | `Bank_of_America` (3) over `BANK_OF_AMERICA` (1) |
//! | Then the shorter name | `Target` over `Target_Corporation` |
//! | Then the smaller name | deterministic final tie-break |
//!
//! # Usage
//!
//! ```no_run
//! use docsort_merger::{FolderMerger, MergeConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let merger = FolderMerger::new(MergeConfig::default())?;
//! let outcome = merger.merge_duplicates(Path::new("/srv/documents"))?;
//!
//! println!("{}", outcome.report.summary());
//! println!("Seeding {} companies", outcome.seed.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use docsort_merger::MergeConfig;
//!
//! // Default: cluster at 0.75 and merge for real
//! let config = MergeConfig::default();
//!
//! // Dry run: report clusters, touch nothing
//! let config = MergeConfig::preview();
//!
//! // Scan only: no clustering, every folder seeded as-is
//! let config = MergeConfig::scan_only();
//! ```
//!
//! # Failure handling
//!
//! Only an unreadable output root aborts the pass. A file that cannot be
//! moved stays in its original folder and is listed under
//! [`ClusterReport::failures`]; a loser folder that cannot be emptied is
//! left in place with a warning. Running the pass twice in a row is a
//! no-op the second time.

#![warn(missing_docs)]

mod cluster;
mod config;
mod error;
mod merger;
mod report;
mod scan;

pub use cluster::{plan_merges, MergePlan, UnionFind};
pub use config::MergeConfig;
pub use error::MergeError;
pub use merger::{free_destination, FolderMerger, MergeOutcome};
pub use report::{ClusterReport, ConflictRename, FileFailure, MergeReport};
pub use scan::{count_files, scan_output_root, FolderCandidate};
