//! Merge pass reporting

use serde::Serialize;
use std::path::PathBuf;

/// A file that could not be moved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    /// Source path, left where it was
    pub file: PathBuf,
    /// Error text
    pub reason: String,
}

/// A file renamed to avoid overwriting one already in the winner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRename {
    /// Path relative to the folder root, as it was in the loser
    pub original: PathBuf,
    /// Path relative to the winner where it landed
    pub renamed: PathBuf,
}

/// Outcome for one cluster of duplicate folders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterReport {
    /// Folder that survived
    pub winner_folder: String,
    /// Folders folded into the winner
    pub merged_folders: Vec<String>,
    /// Files moved (or, in a dry run, that would move)
    pub files_moved: usize,
    /// Files renamed on collision
    pub conflicts: Vec<ConflictRename>,
    /// Files that stayed behind
    pub failures: Vec<FileFailure>,
    /// Partial-merge notes (loser folder left in place)
    pub warnings: Vec<String>,
}

impl ClusterReport {
    /// Empty report for `winner_folder`
    pub fn new(winner_folder: impl Into<String>) -> Self {
        Self {
            winner_folder: winner_folder.into(),
            ..Default::default()
        }
    }

    /// Whether anything stayed behind
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() || !self.warnings.is_empty()
    }
}

/// Everything the startup merge pass did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    /// One entry per cluster of two or more folders
    pub clusters: Vec<ClusterReport>,
    /// Top-level folders considered
    pub folders_scanned: usize,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl MergeReport {
    /// No folders were merged
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Files moved across all clusters
    pub fn total_files_moved(&self) -> usize {
        self.clusters.iter().map(|c| c.files_moved).sum()
    }

    /// Loser folders across all clusters
    pub fn total_folders_merged(&self) -> usize {
        self.clusters.iter().map(|c| c.merged_folders.len()).sum()
    }

    /// Collision renames across all clusters
    pub fn total_conflicts(&self) -> usize {
        self.clusters.iter().map(|c| c.conflicts.len()).sum()
    }

    /// Per-file failures across all clusters
    pub fn total_failures(&self) -> usize {
        self.clusters.iter().map(|c| c.failures.len()).sum()
    }

    /// Generate a plain-text summary
    pub fn summary(&self) -> String {
        let title = if self.dry_run {
            "Folder Merge Summary (dry run)"
        } else {
            "Folder Merge Summary"
        };
        let mut lines = vec![
            title.to_string(),
            "=".repeat(title.len()),
            format!("Folders scanned: {}", self.folders_scanned),
            format!("Clusters: {}", self.clusters.len()),
            format!("Folders merged: {}", self.total_folders_merged()),
            format!("Files moved: {}", self.total_files_moved()),
            format!("Conflicts renamed: {}", self.total_conflicts()),
            format!("Failures: {}", self.total_failures()),
        ];

        for cluster in &self.clusters {
            lines.push(String::new());
            lines.push(format!(
                "{} <- {}",
                cluster.winner_folder,
                cluster.merged_folders.join(", ")
            ));
            lines.push(format!("  files moved: {}", cluster.files_moved));
            for conflict in &cluster.conflicts {
                lines.push(format!(
                    "  renamed: {} -> {}",
                    conflict.original.display(),
                    conflict.renamed.display()
                ));
            }
            for failure in &cluster.failures {
                lines.push(format!("  failed: {} ({})", failure.file.display(), failure.reason));
            }
            for warning in &cluster.warnings {
                lines.push(format!("  warning: {}", warning));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MergeReport {
        let mut cluster = ClusterReport::new("Bank_of_America");
        cluster.merged_folders.push("BANK_OF_AMERICA".to_string());
        cluster.files_moved = 2;
        cluster.conflicts.push(ConflictRename {
            original: PathBuf::from("statement.pdf"),
            renamed: PathBuf::from("statement_1.pdf"),
        });
        MergeReport {
            clusters: vec![cluster],
            folders_scanned: 3,
            dry_run: false,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = MergeReport::default();
        assert!(report.is_empty());
        assert_eq!(report.total_files_moved(), 0);
        assert!(report.summary().contains("Clusters: 0"));
    }

    #[test]
    fn test_totals_and_summary() {
        let report = sample();
        assert!(!report.is_empty());
        assert_eq!(report.total_files_moved(), 2);
        assert_eq!(report.total_conflicts(), 1);
        assert_eq!(report.total_folders_merged(), 1);
        assert!(!report.clusters[0].is_partial());

        let summary = report.summary();
        assert!(summary.contains("Bank_of_America <- BANK_OF_AMERICA"));
        assert!(summary.contains("renamed: statement.pdf -> statement_1.pdf"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["clusters"][0]["winner_folder"], "Bank_of_America");
        assert_eq!(json["clusters"][0]["conflicts"][0]["renamed"], "statement_1.pdf");
        assert_eq!(json["folders_scanned"], 3);
    }
}
