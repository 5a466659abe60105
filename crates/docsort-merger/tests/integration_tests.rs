//! Integration tests for the startup merge pass
//!
//! Each test builds a synthetic output tree in a temporary directory.

use docsort_merger::{FolderMerger, MergeConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn file_count(root: &Path) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}

fn top_level(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn bank_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Bank_of_America/jan.pdf", "jan");
    touch(dir.path(), "Bank_of_America/feb.pdf", "feb");
    touch(dir.path(), "Bank_of_America/mar.pdf", "mar");
    touch(dir.path(), "BANK_OF_AMERICA/apr.pdf", "apr");
    dir
}

#[test]
fn test_case_duplicates_merge_into_larger_folder() {
    let dir = bank_tree();
    let merger = FolderMerger::new(MergeConfig::default()).unwrap();
    let outcome = merger.merge_duplicates(dir.path()).unwrap();

    assert_eq!(top_level(dir.path()), vec!["Bank_of_America"]);
    assert_eq!(file_count(&dir.path().join("Bank_of_America")), 4);

    let report = &outcome.report;
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.clusters[0].winner_folder, "Bank_of_America");
    assert_eq!(report.clusters[0].merged_folders, vec!["BANK_OF_AMERICA"]);
    assert_eq!(report.clusters[0].files_moved, 1);
    assert!(report.clusters[0].failures.is_empty());

    assert_eq!(outcome.seed.len(), 1);
    assert_eq!(outcome.seed[0].canonical_name, "Bank_of_America");
    assert_eq!(outcome.seed[0].file_count, 4);
}

#[test]
fn test_collision_gets_numeric_suffix() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Acme/statement.pdf", "winner");
    touch(dir.path(), "Acme/other.pdf", "winner");
    touch(dir.path(), "ACME/statement.pdf", "loser");

    let before = file_count(dir.path());
    let outcome = FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    let acme = dir.path().join("Acme");
    assert_eq!(fs::read_to_string(acme.join("statement.pdf")).unwrap(), "winner");
    assert_eq!(fs::read_to_string(acme.join("statement_1.pdf")).unwrap(), "loser");
    assert_eq!(file_count(dir.path()), before);

    let conflicts = &outcome.report.clusters[0].conflicts;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].renamed, Path::new("statement_1.pdf"));
}

#[test]
fn test_subdirectories_preserved() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Target/2023/a.pdf", "a");
    touch(dir.path(), "Target/2023/b.pdf", "b");
    touch(dir.path(), "Target_Corporation/2024/q1/c.pdf", "c");
    touch(dir.path(), "Target_Corporation/2023/a.pdf", "a2");

    FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    let target = dir.path().join("Target");
    assert!(target.join("2024/q1/c.pdf").exists());
    assert!(target.join("2023/a_1.pdf").exists());
    assert!(!dir.path().join("Target_Corporation").exists());
    assert_eq!(file_count(&target), 4);
}

#[test]
fn test_second_pass_is_noop() {
    let dir = bank_tree();
    touch(dir.path(), "Wells_Fargo/x.pdf", "x");
    let merger = FolderMerger::new(MergeConfig::default()).unwrap();

    let first = merger.merge_duplicates(dir.path()).unwrap();
    assert!(!first.report.is_empty());

    let second = merger.merge_duplicates(dir.path()).unwrap();
    assert!(second.report.is_empty());
    assert_eq!(second.report.folders_scanned, 2);
    assert_eq!(second.seed.len(), 2);
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = bank_tree();
    let merger = FolderMerger::new(MergeConfig::preview()).unwrap();
    let outcome = merger.merge_duplicates(dir.path()).unwrap();

    assert_eq!(top_level(dir.path()), vec!["BANK_OF_AMERICA", "Bank_of_America"]);
    assert!(outcome.report.dry_run);
    assert_eq!(outcome.report.clusters.len(), 1);
    assert_eq!(outcome.report.clusters[0].files_moved, 1);
    assert_eq!(outcome.seed.len(), 2);
}

#[test]
fn test_dry_run_predicts_conflicts() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Acme/statement.pdf", "1");
    touch(dir.path(), "Acme/extra.pdf", "1");
    touch(dir.path(), "ACME/statement.pdf", "2");
    touch(dir.path(), "Acme_Inc/statement.pdf", "3");

    let outcome = FolderMerger::new(MergeConfig::preview())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    let cluster = &outcome.report.clusters[0];
    assert_eq!(cluster.winner_folder, "Acme");
    assert_eq!(cluster.files_moved, 2);
    let renamed: Vec<_> = cluster.conflicts.iter().map(|c| c.renamed.clone()).collect();
    assert_eq!(
        renamed,
        vec![Path::new("statement_1.pdf").to_path_buf(), Path::new("statement_2.pdf").to_path_buf()]
    );
}

#[test]
fn test_scan_only_seeds_every_folder() {
    let dir = bank_tree();
    let outcome = FolderMerger::new(MergeConfig::scan_only())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    assert!(outcome.report.is_empty());
    assert_eq!(outcome.seed.len(), 2);
    assert_eq!(top_level(dir.path()).len(), 2);
}

#[test]
fn test_unknown_and_hidden_folders_untouched() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Unknown/a.pdf", "a");
    touch(dir.path(), "unknown/b.pdf", "b");
    touch(dir.path(), ".trash/c.pdf", "c");

    let outcome = FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    assert!(outcome.report.is_empty());
    assert_eq!(top_level(dir.path()), vec![".trash", "Unknown", "unknown"]);
    let seeded: Vec<&str> = outcome.seed.iter().map(|e| e.canonical_name.as_str()).collect();
    assert_eq!(seeded, vec!["Unknown", "unknown"]);
}

#[test]
fn test_hyphen_and_underscore_spellings_merge() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Acme-Corp/a.pdf", "a");
    touch(dir.path(), "Acme-Corp/b.pdf", "b");
    touch(dir.path(), "Acme_Corp/c.pdf", "c");
    touch(dir.path(), "The-Home-Depot/d.pdf", "d");
    touch(dir.path(), "Home_Depot/e.pdf", "e");

    let outcome = FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    assert_eq!(outcome.report.clusters.len(), 2);
    assert_eq!(top_level(dir.path()), vec!["Acme-Corp", "Home_Depot"]);
    assert_eq!(file_count(&dir.path().join("Acme-Corp")), 3);
    assert_eq!(file_count(&dir.path().join("Home_Depot")), 2);
}

#[test]
fn test_missing_root_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let outcome = FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(&dir.path().join("not-yet"))
        .unwrap();
    assert!(outcome.report.is_empty());
    assert!(outcome.seed.is_empty());
}

#[test]
fn test_merged_winner_knows_loser_alias() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Pacific_Gas_and_Electric/a.pdf", "a");
    touch(dir.path(), "Pacific_Gas_and_Electric/b.pdf", "b");
    touch(dir.path(), "Pacific_Gas_&_Electric/c.pdf", "c");

    let outcome = FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();

    assert_eq!(outcome.seed.len(), 1);
    assert_eq!(outcome.seed[0].alias_keys.len(), 2);
}

#[cfg(unix)]
#[test]
fn test_unmovable_file_reported_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = bank_tree();
    let locked = dir.path().join("BANK_OF_AMERICA/locked");
    touch(&locked, "x.pdf", "x");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores permission bits; nothing to observe then
    if fs::write(locked.join("probe"), "p").is_ok() {
        let _ = fs::remove_file(locked.join("probe"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let outcome = FolderMerger::new(MergeConfig::default())
        .unwrap()
        .merge_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let cluster = &outcome.report.clusters[0];
    assert_eq!(cluster.failures.len(), 1);
    assert_eq!(cluster.files_moved, 1);
    assert!(cluster.is_partial());
    assert!(dir.path().join("BANK_OF_AMERICA/locked/x.pdf").exists());
    assert_eq!(file_count(&dir.path().join("Bank_of_America")), 4);
}
