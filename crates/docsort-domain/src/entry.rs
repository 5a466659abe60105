//! Canonical entry - the unit of company identity

use crate::normalize::NormalizedKey;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One real-world company as known to the registry
///
/// Every live entry owns a distinct `folder_path`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEntry {
    /// Display name chosen for the company
    pub canonical_name: String,

    /// Comparison key of `canonical_name`
    pub key: NormalizedKey,

    /// Directory under the output root holding this company's files
    pub folder_path: PathBuf,

    /// Number of files currently under `folder_path`
    pub file_count: usize,

    /// Normalized forms that have been matched to this entry
    pub alias_keys: BTreeSet<NormalizedKey>,
}

impl CanonicalEntry {
    /// Create an entry with no files whose only alias is its own key
    pub fn new(canonical_name: impl Into<String>, key: NormalizedKey, folder_path: PathBuf) -> Self {
        let mut alias_keys = BTreeSet::new();
        alias_keys.insert(key.clone());
        Self {
            canonical_name: canonical_name.into(),
            key,
            folder_path,
            file_count: 0,
            alias_keys,
        }
    }

    /// Set the file count
    pub fn with_file_count(mut self, file_count: usize) -> Self {
        self.file_count = file_count;
        self
    }

    /// Last path component of `folder_path`
    pub fn folder_name(&self) -> String {
        self.folder_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Record another normalized form; returns false if it was already known
    pub fn add_alias(&mut self, key: NormalizedKey) -> bool {
        self.alias_keys.insert(key)
    }

    /// Fold a losing entry into this one
    ///
    /// Aliases are unioned and file counts summed. The winner keeps its
    /// name, key and folder.
    pub fn absorb(&mut self, loser: CanonicalEntry) {
        self.file_count += loser.file_count;
        self.alias_keys.extend(loser.alias_keys);
        self.alias_keys.insert(loser.key);
    }

    /// Which of two entries should represent the company
    ///
    /// `Ordering::Less` means `self` wins. See [`compare_precedence`].
    pub fn precedence(&self, other: &CanonicalEntry) -> Ordering {
        compare_precedence(
            self.file_count,
            &self.canonical_name,
            other.file_count,
            &other.canonical_name,
        )
    }
}

/// Deterministic tie-break between two candidate identities
///
/// More files wins; then the shorter name ("Target" over "Target
/// Corporation"); then the lexicographically smaller name. Returns
/// `Ordering::Less` when the first candidate wins.
pub fn compare_precedence(a_files: usize, a_name: &str, b_files: usize, b_name: &str) -> Ordering {
    b_files
        .cmp(&a_files)
        .then_with(|| a_name.chars().count().cmp(&b_name.chars().count()))
        .then_with(|| a_name.cmp(b_name))
}
