//! Command implementations.

pub mod companies;
pub mod config;
pub mod merge;
pub mod resolve;
pub mod score;

pub use self::companies::execute_companies;
pub use self::config::execute_config;
pub use self::merge::execute_merge;
pub use self::resolve::execute_resolve;
pub use self::score::execute_score;

use crate::config::Config;
use crate::error::Result;
use docsort_merger::{FolderMerger, MergeReport};
use docsort_registry::CanonicalRegistry;

/// Run the startup pass over the output root and seed a registry from it.
///
/// With `merge` false the pass only scans; duplicate folders stay as they are.
pub fn open_registry(config: &Config, merge: bool) -> Result<(MergeReport, CanonicalRegistry)> {
    let mut merge_config = config.merge_config();
    merge_config.auto_merge &= merge;

    let outcome = FolderMerger::new(merge_config)?.merge_duplicates(&config.output_root)?;
    let registry = CanonicalRegistry::with_entries(
        config.registry_config(),
        config.output_root.clone(),
        outcome.seed,
    )?;
    tracing::debug!(
        root = %config.output_root.display(),
        companies = registry.len(),
        "Registry ready"
    );
    Ok((outcome.report, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        Config {
            output_root: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_open_registry_merges_and_seeds() {
        let dir = TempDir::new().unwrap();
        for (folder, file) in [("Acme", "a.pdf"), ("Acme", "b.pdf"), ("ACME", "c.pdf")] {
            fs::create_dir_all(dir.path().join(folder)).unwrap();
            fs::write(dir.path().join(folder).join(file), file).unwrap();
        }

        let (report, registry) = open_registry(&config_for(&dir), true).unwrap();
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Acme").unwrap().file_count, 3);
    }

    #[test]
    fn test_open_registry_scan_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Acme")).unwrap();
        fs::create_dir_all(dir.path().join("ACME")).unwrap();

        let (report, registry) = open_registry(&config_for(&dir), false).unwrap();
        assert!(report.is_empty());
        assert_eq!(registry.len(), 2);
        assert!(dir.path().join("ACME").exists());
    }

    #[test]
    fn test_open_registry_without_normalization_keeps_folders() {
        let dir = TempDir::new().unwrap();
        for (folder, file) in [("Acme", "a.pdf"), ("Acme", "b.pdf"), ("ACME", "c.pdf")] {
            fs::create_dir_all(dir.path().join(folder)).unwrap();
            fs::write(dir.path().join(folder).join(file), file).unwrap();
        }

        let mut config = config_for(&dir);
        config.apply_overrides(None, None, true).unwrap();

        let (report, mut registry) = open_registry(&config, true).unwrap();
        assert!(report.clusters.is_empty());
        assert_eq!(registry.len(), 2);
        assert!(dir.path().join("ACME").join("c.pdf").exists());

        let resolution = registry.resolve("ACME");
        assert_eq!(resolution.kind, docsort_registry::MatchKind::Folder);
        assert_eq!(resolution.entry.folder_path, dir.path().join("ACME"));
    }
}
