//! Output-root scanning

use crate::MergeError;
use docsort_domain::{folder_name_to_display, normalize, CanonicalEntry, NormalizedKey};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One top-level folder under the output root
#[derive(Debug, Clone, PartialEq)]
pub struct FolderCandidate {
    /// Folder name on disk
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Comparison key of the folder name
    pub key: NormalizedKey,
    /// Recursive count of files under `path`
    pub file_count: usize,
}

impl FolderCandidate {
    /// Build a candidate from a folder name and its file count
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, file_count: usize) -> Self {
        let name = name.into();
        let key = normalize(&folder_name_to_display(&name)).key;
        Self {
            name,
            path: path.into(),
            key,
            file_count,
        }
    }

    /// Whether the folder name starts with `.`
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Registry entry for this folder, named after the folder itself
    pub fn to_entry(&self) -> CanonicalEntry {
        CanonicalEntry::new(self.name.clone(), self.key.clone(), self.path.clone())
            .with_file_count(self.file_count)
    }
}

/// List the immediate subdirectories of `root`, sorted by name
///
/// A missing root yields no candidates. A root that exists but cannot be
/// listed is an error.
pub fn scan_output_root(root: &Path, skip_hidden: bool) -> Result<Vec<FolderCandidate>, MergeError> {
    let metadata = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "Output root does not exist yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(MergeError::io(root, e)),
    };
    if !metadata.is_dir() {
        return Err(MergeError::io(
            root,
            io::Error::other("output root is not a directory"),
        ));
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| MergeError::io(root, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        // Symlinks are not followed
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => {}
            _ => continue,
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if skip_hidden && name.starts_with('.') {
            debug!(folder = %name, "Skipping hidden folder");
            continue;
        }

        let path = entry.path();
        let file_count = count_files(&path);
        debug!(folder = %name, file_count, "Scanned folder");
        candidates.push(FolderCandidate::new(name, path, file_count));
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

/// Recursive number of non-directory entries under `path`
pub fn count_files(path: &Path) -> usize {
    WalkDir::new(path)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let candidates = scan_output_root(&dir.path().join("nope"), true).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        touch(&file);
        assert!(matches!(scan_output_root(&file, true), Err(MergeError::Io { .. })));
    }

    #[test]
    fn test_scan_counts_recursively() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("Bank_of_America/a.pdf"));
        touch(&dir.path().join("Bank_of_America/2024/b.pdf"));
        touch(&dir.path().join("Acme/c.pdf"));
        touch(&dir.path().join("loose.pdf"));
        fs::create_dir_all(dir.path().join(".cache")).unwrap();

        let candidates = scan_output_root(dir.path(), true).unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Bank_of_America"]);
        assert_eq!(candidates[1].file_count, 2);
        assert_eq!(candidates[1].key.as_str(), "bank of america");

        let with_hidden = scan_output_root(dir.path(), false).unwrap();
        assert_eq!(with_hidden.len(), 3);
        assert!(with_hidden[0].is_hidden());
    }

    #[test]
    fn test_candidate_entry() {
        let c = FolderCandidate::new("BANK_OF_AMERICA", "/out/BANK_OF_AMERICA", 1);
        let entry = c.to_entry();
        assert_eq!(entry.canonical_name, "BANK_OF_AMERICA");
        assert_eq!(entry.file_count, 1);
        assert_eq!(entry.key, normalize("Bank of America").key);
    }
}
