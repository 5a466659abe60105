//! Startup merge of duplicate company folders

use crate::cluster::{plan_merges, MergePlan};
use crate::report::{ClusterReport, ConflictRename, FileFailure, MergeReport};
use crate::scan::{count_files, scan_output_root, FolderCandidate};
use crate::{MergeConfig, MergeError};
use docsort_domain::CanonicalEntry;
use std::collections::{BTreeSet, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result of a merge pass: the report plus the registry's initial state
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// What happened
    pub report: MergeReport,
    /// One entry per surviving top-level folder, sorted by folder name
    pub seed: Vec<CanonicalEntry>,
}

/// Scans an output root, clusters similar folders and merges losers into winners
///
/// # Examples
///
/// ```no_run
/// use docsort_merger::{FolderMerger, MergeConfig};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let merger = FolderMerger::new(MergeConfig::default())?;
/// let outcome = merger.merge_duplicates(Path::new("/srv/documents"))?;
/// println!("{}", outcome.report.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FolderMerger {
    config: MergeConfig,
}

impl FolderMerger {
    /// Create a merger; fails on an invalid threshold
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Run the full pass over `root`
    ///
    /// Only an unreadable root fails the pass. Per-file problems end up
    /// in the report and the pass continues.
    pub fn merge_duplicates(&self, root: &Path) -> Result<MergeOutcome, MergeError> {
        let candidates = scan_output_root(root, self.config.skip_hidden)?;
        let mut report = MergeReport {
            folders_scanned: candidates.len(),
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        if !self.config.auto_merge {
            debug!(folders = candidates.len(), "Auto-merge disabled, seeding only");
            let seed = candidates.iter().map(FolderCandidate::to_entry).collect();
            return Ok(MergeOutcome { report, seed });
        }

        let plans = plan_merges(&candidates, self.config.similarity_threshold);
        let mut gone: BTreeSet<usize> = BTreeSet::new();
        let mut absorbed: Vec<(usize, usize)> = Vec::new();

        for plan in &plans {
            let cluster = self.merge_cluster(&candidates, plan);
            if !self.config.dry_run {
                for &loser in &plan.losers {
                    gone.insert(loser);
                    if !candidates[loser].path.exists() {
                        absorbed.push((plan.winner, loser));
                    }
                }
            }
            report.clusters.push(cluster);
        }

        let seed = self.build_seed(&candidates, &gone, &absorbed);
        if !report.is_empty() {
            info!(
                clusters = report.clusters.len(),
                files_moved = report.total_files_moved(),
                failures = report.total_failures(),
                dry_run = self.config.dry_run,
                "Merge pass complete"
            );
        }
        Ok(MergeOutcome { report, seed })
    }

    fn merge_cluster(&self, candidates: &[FolderCandidate], plan: &MergePlan) -> ClusterReport {
        let winner = &candidates[plan.winner];
        let mut cluster = ClusterReport::new(winner.name.clone());
        let mut planned: HashSet<PathBuf> = HashSet::new();

        for &index in &plan.losers {
            let loser = &candidates[index];
            info!(
                winner = %winner.name,
                loser = %loser.name,
                files = loser.file_count,
                dry_run = self.config.dry_run,
                "Merging folder"
            );
            cluster.merged_folders.push(loser.name.clone());
            self.move_folder_contents(&loser.path, &winner.path, &mut planned, &mut cluster);

            if self.config.dry_run {
                continue;
            }
            remove_empty_dirs(&loser.path);
            if loser.path.exists() {
                let remaining = count_files(&loser.path);
                let warning = format!(
                    "{} left in place with {} file(s) not moved",
                    loser.name, remaining
                );
                warn!(folder = %loser.name, remaining, "Partial merge");
                cluster.warnings.push(warning);
            }
        }

        cluster
    }

    /// Move every file under `src` into `dst`, keeping relative paths
    fn move_folder_contents(
        &self,
        src: &Path,
        dst: &Path,
        planned: &mut HashSet<PathBuf>,
        cluster: &mut ClusterReport,
    ) {
        // Collect first; the tree changes underneath as files move
        let entries: Vec<_> = WalkDir::new(src)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .collect();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let file = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.to_path_buf());
                    warn!(file = %file.display(), error = %e, "Cannot read entry");
                    cluster.failures.push(FileFailure {
                        file,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let source = entry.path();
            let Ok(relative) = source.strip_prefix(src) else {
                continue;
            };
            let target = dst.join(relative);
            let destination = free_destination(&target, planned);
            planned.insert(destination.clone());

            if destination != target {
                let renamed = destination
                    .strip_prefix(dst)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| destination.clone());
                debug!(original = %relative.display(), renamed = %renamed.display(), "Name conflict");
                cluster.conflicts.push(ConflictRename {
                    original: relative.to_path_buf(),
                    renamed,
                });
            }

            if self.config.dry_run {
                cluster.files_moved += 1;
                continue;
            }

            match move_file(source, &destination) {
                Ok(()) => cluster.files_moved += 1,
                Err(e) => {
                    warn!(file = %source.display(), error = %e, "Failed to move file");
                    // The rename never happened; drop it from the report
                    if destination != target {
                        cluster.conflicts.pop();
                    }
                    cluster.failures.push(FileFailure {
                        file: source.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    fn build_seed(
        &self,
        candidates: &[FolderCandidate],
        gone: &BTreeSet<usize>,
        absorbed: &[(usize, usize)],
    ) -> Vec<CanonicalEntry> {
        let mut seed = Vec::with_capacity(candidates.len());
        for (index, candidate) in candidates.iter().enumerate() {
            if gone.contains(&index) {
                continue;
            }
            let mut entry = candidate.to_entry();
            if !self.config.dry_run {
                entry.file_count = count_files(&candidate.path);
            }
            for &(_, loser) in absorbed.iter().filter(|(winner, _)| *winner == index) {
                entry.add_alias(candidates[loser].key.clone());
            }
            seed.push(entry);
        }
        seed
    }
}

/// First path at or after `target` that is neither on disk nor already planned
///
/// Collisions become `stem_1.ext`, `stem_2.ext`, ... using the smallest
/// free number.
pub fn free_destination(target: &Path, planned: &HashSet<PathBuf>) -> PathBuf {
    let taken = |p: &Path| planned.contains(p) || fs::symlink_metadata(p).is_ok();
    if !taken(target) {
        return target.to_path_buf();
    }

    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = target.extension().map(|e| e.to_string_lossy().into_owned());

    let mut n = 1usize;
    loop {
        let mut name = OsString::from(format!("{}_{}", stem, n));
        if let Some(ext) = &extension {
            name.push(".");
            name.push(ext);
        }
        let candidate = parent.join(name);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Move a file, falling back to copy + remove across filesystems
fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(src, dst) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(file = %src.display(), error = %e, "Rename crosses devices, copying");
            copy_then_remove(src, dst)
        }
        result => result,
    }
}

/// Leaves exactly one of `src` and `dst` on disk whatever fails
fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    if let Err(e) = fs::copy(src, dst) {
        let _ = fs::remove_file(dst);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(src) {
        let _ = fs::remove_file(dst);
        return Err(e);
    }
    Ok(())
}

/// Remove `root` and every directory beneath it that is empty, deepest first
fn remove_empty_dirs(root: &Path) {
    let dirs: Vec<PathBuf> = WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();

    for dir in dirs {
        // Fails on non-empty directories, which stay
        if fs::remove_dir(&dir).is_ok() {
            debug!(dir = %dir.display(), "Removed empty directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, path.to_string_lossy().as_bytes()).unwrap();
    }

    #[test]
    fn test_free_destination() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("statement.pdf");
        let planned = HashSet::new();
        assert_eq!(free_destination(&target, &planned), target);

        touch(&target);
        touch(&dir.path().join("statement_1.pdf"));
        assert_eq!(free_destination(&target, &planned), dir.path().join("statement_2.pdf"));

        let mut planned = HashSet::new();
        planned.insert(dir.path().join("statement_2.pdf"));
        assert_eq!(free_destination(&target, &planned), dir.path().join("statement_3.pdf"));
    }

    #[test]
    fn test_free_destination_without_extension() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("README");
        touch(&target);
        assert_eq!(free_destination(&target, &HashSet::new()), dir.path().join("README_1"));
    }

    #[test]
    fn test_move_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a/file.txt");
        let dst = dir.path().join("b/nested/file.txt");
        touch(&src);
        move_file(&src, &dst).unwrap();
        assert!(!src.exists());
        assert!(dst.exists());
    }

    #[test]
    fn test_move_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = move_file(&dir.path().join("missing"), &dir.path().join("dst"));
        assert!(result.is_err());
        assert!(!dir.path().join("dst").exists());
    }

    #[test]
    fn test_copy_then_remove() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a/x.pdf");
        let dst = dir.path().join("b/x.pdf");
        touch(&src);
        fs::create_dir_all(dst.parent().unwrap()).unwrap();

        copy_then_remove(&src, &dst).unwrap();
        assert!(!src.exists());
        assert!(dst.exists());
    }

    #[test]
    fn test_failed_copy_leaves_no_destination() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be copied as a file
        let src = dir.path().join("a/nested");
        fs::create_dir_all(&src).unwrap();
        let dst = dir.path().join("b.pdf");

        assert!(copy_then_remove(&src, &dst).is_err());
        assert!(src.exists());
        assert!(!dst.exists());
    }

    #[test]
    fn test_remove_empty_dirs_keeps_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Loser");
        fs::create_dir_all(root.join("a/b")).unwrap();
        touch(&root.join("c/keep.txt"));

        remove_empty_dirs(&root);
        assert!(!root.join("a").exists());
        assert!(root.join("c/keep.txt").exists());

        fs::remove_file(root.join("c/keep.txt")).unwrap();
        remove_empty_dirs(&root);
        assert!(!root.exists());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = MergeConfig::default().with_threshold(2.0);
        assert!(matches!(FolderMerger::new(config), Err(MergeError::Config(_))));
    }
}
