//! Canonical name resolution

use crate::{RegistryConfig, RegistryError};
use docsort_domain::{
    is_placeholder_name, is_unknown_folder, sanitize_folder_name, similarity, CanonicalEntry, NormalizedKey,
    Normalizer, SimilarityScore, UNKNOWN_NAME,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How a raw name was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Normalized form was already a known alias
    Alias,

    /// Matched an existing entry by similarity
    Fuzzy,

    /// Sanitized folder already belonged to an entry
    Folder,

    /// A new entry was registered
    Created,

    /// Empty or placeholder name, routed to the reserved entry
    Placeholder,
}

impl MatchKind {
    /// Short label for display
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Alias => "alias",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Folder => "folder",
            MatchKind::Created => "created",
            MatchKind::Placeholder => "placeholder",
        }
    }
}

/// Outcome of [`CanonicalRegistry::resolve`]
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Snapshot of the entry the name resolved to
    pub entry: CanonicalEntry,

    /// How the match was made
    pub kind: MatchKind,

    /// Similarity to the entry's key, when one was computed
    pub score: Option<SimilarityScore>,
}

impl Resolution {
    fn new(entry: &CanonicalEntry, kind: MatchKind, score: Option<SimilarityScore>) -> Self {
        Self {
            entry: entry.clone(),
            kind,
            score,
        }
    }

    /// Whether resolution registered a new entry
    pub fn is_new(&self) -> bool {
        self.kind == MatchKind::Created
    }
}

/// Aggregate numbers about a registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStatistics {
    /// Number of canonical entries
    pub total_entries: usize,
    /// Number of alias keys across all entries
    pub total_aliases: usize,
    /// `total_aliases / total_entries`, 0 when empty
    pub average_aliases: f64,
    /// Sum of file counts
    pub total_files: usize,
    /// Threshold in use
    pub similarity_threshold: f64,
    /// Whether fuzzy matching is on
    pub normalization_enabled: bool,
}

/// In-memory set of canonical company entries
///
/// Entries are keyed by folder name, so no two entries can share a
/// folder. Resolution order for a raw name:
///
/// 1. placeholder names go to the reserved `Unknown` entry
/// 2. a known alias key returns its entry
/// 3. the best-scoring entry at or above the threshold (ties broken by
///    file count, then name length)
/// 4. otherwise a new entry, unless its folder is already taken
///
/// # Examples
///
/// ```
/// use docsort_registry::{CanonicalRegistry, MatchKind, RegistryConfig};
///
/// let mut registry = CanonicalRegistry::new(RegistryConfig::default(), "/out").unwrap();
/// let first = registry.resolve("The Target Corporation");
/// assert_eq!(first.kind, MatchKind::Created);
///
/// let second = registry.resolve("TARGET CORP");
/// assert_eq!(second.entry.folder_path, first.entry.folder_path);
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CanonicalRegistry {
    config: RegistryConfig,
    output_root: PathBuf,
    normalizer: Normalizer,
    entries: BTreeMap<String, CanonicalEntry>,
}

impl CanonicalRegistry {
    /// Create an empty registry rooted at `output_root`
    pub fn new(config: RegistryConfig, output_root: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        config.validate()?;
        Ok(Self {
            config,
            output_root: output_root.into(),
            normalizer: Normalizer::default(),
            entries: BTreeMap::new(),
        })
    }

    /// Create a registry seeded with existing entries
    ///
    /// Seeds sharing a folder are folded together.
    pub fn with_entries(
        config: RegistryConfig,
        output_root: impl Into<PathBuf>,
        seed: impl IntoIterator<Item = CanonicalEntry>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(config, output_root)?;
        for entry in seed {
            registry.insert(entry);
        }
        debug!(entries = registry.entries.len(), "Seeded registry");
        Ok(registry)
    }

    /// Use custom normalization rules
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Root directory entries live under
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry owning `folder_name`
    pub fn get(&self, folder_name: &str) -> Option<&CanonicalEntry> {
        self.entries.get(folder_name)
    }

    /// All entries ordered by canonical name
    pub fn entries(&self) -> Vec<&CanonicalEntry> {
        let mut all: Vec<&CanonicalEntry> = self.entries.values().collect();
        all.sort_by(|a, b| {
            a.canonical_name
                .to_lowercase()
                .cmp(&b.canonical_name.to_lowercase())
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });
        all
    }

    /// Map a raw company name to its canonical entry
    ///
    /// Never fails; an unmatched name registers a new entry.
    pub fn resolve(&mut self, raw: &str) -> Resolution {
        if is_placeholder_name(raw) {
            return self.resolve_placeholder();
        }
        if !self.config.enable_normalization {
            return self.resolve_literal(raw);
        }

        let normalized = self.normalizer.normalize(raw);
        let key = normalized.key;

        if let Some(entry) = self.find_alias(&key) {
            debug!(name = raw, canonical = %entry.canonical_name, "Alias match");
            return Resolution::new(entry, MatchKind::Alias, Some(1.0));
        }

        if let Some((folder, score)) = self.best_match(&key) {
            if let Some(entry) = self.entries.get_mut(&folder) {
                info!(name = raw, folder = %folder, score, "Fuzzy match");
                entry.add_alias(key);
                return Resolution::new(entry, MatchKind::Fuzzy, Some(score));
            }
        }

        let folder = sanitize_folder_name(&normalized.display_name);
        if let Some(entry) = self.entries.get_mut(&folder) {
            let score = similarity(&key, &entry.key);
            debug!(name = raw, folder = %folder, score, "Folder already registered");
            entry.add_alias(key);
            return Resolution::new(entry, MatchKind::Folder, Some(score));
        }

        info!(name = raw, canonical = %normalized.display_name, folder = %folder, "New company");
        let path = self.output_root.join(&folder);
        let entry = self
            .entries
            .entry(folder)
            .or_insert_with(|| CanonicalEntry::new(normalized.display_name, key, path));
        Resolution::new(entry, MatchKind::Created, None)
    }

    /// Count one more file under `folder_name`; false if no such entry
    pub fn record_file(&mut self, folder_name: &str) -> bool {
        match self.entries.get_mut(folder_name) {
            Some(entry) => {
                entry.file_count += 1;
                true
            }
            None => false,
        }
    }

    /// Fold the `loser` entry into `winner`
    pub fn absorb(&mut self, winner: &str, loser: &str) -> Result<(), RegistryError> {
        if winner == loser {
            return Ok(());
        }
        if !self.entries.contains_key(winner) {
            return Err(RegistryError::UnknownEntry(winner.to_string()));
        }
        let loser_entry = self
            .entries
            .remove(loser)
            .ok_or_else(|| RegistryError::UnknownEntry(loser.to_string()))?;
        if let Some(entry) = self.entries.get_mut(winner) {
            entry.absorb(loser_entry);
        }
        info!(winner, loser, "Absorbed entry");
        Ok(())
    }

    /// Aggregate counts
    pub fn statistics(&self) -> RegistryStatistics {
        let total_entries = self.entries.len();
        let total_aliases = self.entries.values().map(|e| e.alias_keys.len()).sum();
        let total_files = self.entries.values().map(|e| e.file_count).sum();
        let average_aliases = if total_entries == 0 {
            0.0
        } else {
            total_aliases as f64 / total_entries as f64
        };
        RegistryStatistics {
            total_entries,
            total_aliases,
            average_aliases,
            total_files,
            similarity_threshold: self.config.similarity_threshold,
            normalization_enabled: self.config.enable_normalization,
        }
    }

    fn insert(&mut self, entry: CanonicalEntry) {
        let mut folder = entry.folder_name();
        if folder.is_empty() {
            folder = sanitize_folder_name(&entry.canonical_name);
        }
        match self.entries.get_mut(&folder) {
            Some(existing) => existing.absorb(entry),
            None => {
                self.entries.insert(folder, entry);
            }
        }
    }

    /// Reserved entry; an existing `unknown` folder in any casing is reused
    fn resolve_placeholder(&mut self) -> Resolution {
        let folder = self
            .entries
            .keys()
            .filter(|folder| is_unknown_folder(folder))
            .min_by_key(|folder| folder.as_str() != UNKNOWN_NAME)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let path = self.output_root.join(&folder);
        let entry = self.entries.entry(folder).or_insert_with(|| {
            CanonicalEntry::new(UNKNOWN_NAME, NormalizedKey::literal(UNKNOWN_NAME.to_lowercase()), path)
        });
        Resolution::new(entry, MatchKind::Placeholder, None)
    }

    /// Exact matching on the literal name, keyed by its folder
    fn resolve_literal(&mut self, raw: &str) -> Resolution {
        let name = raw.trim();
        let folder = sanitize_folder_name(name);
        if let Some(entry) = self.entries.get(&folder) {
            return Resolution::new(entry, MatchKind::Folder, None);
        }
        info!(name, folder = %folder, "New company (normalization disabled)");
        let path = self.output_root.join(&folder);
        let entry = self
            .entries
            .entry(folder)
            .or_insert_with(|| CanonicalEntry::new(name, NormalizedKey::literal(name), path));
        Resolution::new(entry, MatchKind::Created, None)
    }

    fn find_alias(&self, key: &NormalizedKey) -> Option<&CanonicalEntry> {
        self.matchable()
            .map(|(_, entry)| entry)
            .filter(|entry| entry.alias_keys.contains(key))
            .min_by(|a, b| a.precedence(b))
    }

    fn best_match(&self, key: &NormalizedKey) -> Option<(String, SimilarityScore)> {
        let threshold = self.config.similarity_threshold;
        let mut best: Option<(&String, &CanonicalEntry, SimilarityScore)> = None;

        for (folder, entry) in self.matchable() {
            let score = similarity(key, &entry.key);
            if score < threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, current, best_score)) => match score.partial_cmp(&best_score) {
                    Some(Ordering::Greater) => true,
                    Some(Ordering::Equal) => entry.precedence(current) == Ordering::Less,
                    _ => false,
                },
            };
            if better {
                best = Some((folder, entry, score));
            }
        }

        best.map(|(folder, _, score)| (folder.clone(), score))
    }

    /// Entries that ordinary names may match; the reserved entry is excluded
    fn matchable(&self) -> impl Iterator<Item = (&String, &CanonicalEntry)> {
        self.entries
            .iter()
            .filter(|(folder, _)| !is_unknown_folder(folder))
    }
}
