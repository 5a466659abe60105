//! Docsort Domain Layer
//!
//! Pure building blocks of company-name deduplication. This crate has
//! ZERO external dependencies: no I/O, no logging, no configuration
//! loading. Everything here is a deterministic function of its inputs.
//!
//! ## Key Concepts
//!
//! - **Normalized key**: case-, punctuation- and affix-stripped comparison
//!   form of a company name ("The Target Corporation" -> `target`)
//! - **Composite similarity**: weighted blend of character-sequence
//!   similarity, token overlap and a subset bonus, in `[0, 1]`
//! - **Canonical entry**: the single display name and folder chosen for
//!   all known spellings of one company
//! - **Precedence**: the tie-break deciding which of two candidates
//!   represents a company (more files, then shorter name)
//! - **Folder name**: the sanitized, on-disk form of a canonical name;
//!   re-normalizing it yields the same key

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod folder;
pub mod normalize;
pub mod similarity;

// Re-exports for convenience
pub use entry::{compare_precedence, CanonicalEntry};
pub use folder::{
    folder_name_to_display, is_placeholder_name, is_unknown_folder, sanitize_folder_name, MAX_FOLDER_NAME_LEN,
    UNKNOWN_NAME,
};
pub use normalize::{normalize, NormalizedKey, NormalizedName, Normalizer, NormalizerRules};
pub use similarity::{
    score, similarity, validate_threshold, SimilarityBreakdown, SimilarityScore,
    DEFAULT_SIMILARITY_THRESHOLD,
};
