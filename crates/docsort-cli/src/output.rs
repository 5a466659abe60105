//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docsort_domain::{CanonicalEntry, NormalizedName, SimilarityBreakdown};
use docsort_merger::MergeReport;
use docsort_registry::{RegistryStatistics, Resolution};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a merge report.
    pub fn format_report(&self, report: &MergeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report
                .clusters
                .iter()
                .map(|c| c.winner_folder.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    fn format_report_table(&self, report: &MergeReport) -> String {
        let prefix = if report.dry_run { "[dry run] " } else { "" };
        if report.is_empty() {
            return self.info(&format!(
                "{}No duplicate folders among {} scanned.",
                prefix, report.folders_scanned
            ));
        }

        let mut builder = Builder::default();
        builder.push_record(["Winner", "Merged", "Files", "Renamed", "Failed"]);
        for cluster in &report.clusters {
            builder.push_record([
                cluster.winner_folder.clone(),
                cluster.merged_folders.join(", "),
                cluster.files_moved.to_string(),
                cluster.conflicts.len().to_string(),
                cluster.failures.len().to_string(),
            ]);
        }
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string()];
        for cluster in &report.clusters {
            for failure in &cluster.failures {
                lines.push(self.error(&format!(
                    "{}: {}",
                    failure.file.display(),
                    failure.reason
                )));
            }
            for warning in &cluster.warnings {
                lines.push(self.warning(warning));
            }
        }
        lines.push(self.success(&format!(
            "{}Merged {} folder(s), {} file(s) moved",
            prefix,
            report.total_folders_merged(),
            report.total_files_moved()
        )));
        lines.join("\n")
    }

    /// Format name resolutions.
    pub fn format_resolutions(&self, resolutions: &[(String, Resolution)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = resolutions
                    .iter()
                    .map(|(raw, r)| {
                        serde_json::json!({
                            "name": raw,
                            "canonical_name": r.entry.canonical_name,
                            "folder": r.entry.folder_path,
                            "match": r.kind,
                            "score": r.score,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(resolutions
                .iter()
                .map(|(_, r)| r.entry.folder_path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Name", "Canonical", "Folder", "Match", "Score"]);
                for (raw, r) in resolutions {
                    builder.push_record([
                        raw.clone(),
                        r.entry.canonical_name.clone(),
                        r.entry.folder_name(),
                        r.kind.as_str().to_string(),
                        r.score.map(|s| format!("{:.3}", s)).unwrap_or_else(|| "-".to_string()),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the company listing.
    pub fn format_companies(
        &self,
        entries: &[CanonicalEntry],
        stats: &RegistryStatistics,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let companies: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "canonical_name": e.canonical_name,
                            "folder": e.folder_path,
                            "file_count": e.file_count,
                            "aliases": e.alias_keys.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let value = serde_json::json!({
                    "companies": companies,
                    "statistics": stats,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| e.canonical_name.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No companies found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Company", "Folder", "Files", "Aliases"]);
                for e in entries {
                    builder.push_record([
                        e.canonical_name.clone(),
                        e.folder_name(),
                        e.file_count.to_string(),
                        e.alias_keys.len().to_string(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(format!("{}\n{}", table, self.statistics_line(stats)))
            }
        }
    }

    /// One-line statistics summary.
    pub fn statistics_line(&self, stats: &RegistryStatistics) -> String {
        self.info(&format!(
            "{} companies, {} files, {:.2} aliases/company, threshold {:.2}{}",
            stats.total_entries,
            stats.total_files,
            stats.average_aliases,
            stats.similarity_threshold,
            if stats.normalization_enabled { "" } else { " (exact matching)" }
        ))
    }

    /// Format a similarity comparison.
    pub fn format_score(
        &self,
        a: &NormalizedName,
        b: &NormalizedName,
        breakdown: &SimilarityBreakdown,
        threshold: f64,
    ) -> Result<String> {
        let is_match = breakdown.is_match(threshold);
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "a": { "key": a.key.as_str(), "display_name": a.display_name },
                    "b": { "key": b.key.as_str(), "display_name": b.display_name },
                    "sequence": breakdown.sequence,
                    "token_overlap": breakdown.token_overlap,
                    "subset_bonus": breakdown.subset_bonus,
                    "composite": breakdown.composite,
                    "threshold": threshold,
                    "match": is_match,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(format!("{:.4}", breakdown.composite)),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["", "A", "B"]);
                builder.push_record(["Display", a.display_name.as_str(), b.display_name.as_str()]);
                builder.push_record(["Key", a.key.as_str(), b.key.as_str()]);
                let mut names = builder.build();
                names.with(Style::rounded());

                let mut builder = Builder::default();
                builder.push_record(["Component", "Score"]);
                builder.push_record(["sequence (x0.6)".to_string(), format!("{:.4}", breakdown.sequence)]);
                builder.push_record(["token overlap (x0.3)".to_string(), format!("{:.4}", breakdown.token_overlap)]);
                builder.push_record(["subset bonus (x0.1)".to_string(), format!("{:.4}", breakdown.subset_bonus)]);
                builder.push_record(["composite".to_string(), format!("{:.4}", breakdown.composite)]);
                let mut scores = builder.build();
                scores
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                let verdict = if is_match {
                    self.success(&format!("Match (>= {:.2})", threshold))
                } else {
                    self.warning(&format!("No match (< {:.2})", threshold))
                };
                Ok(format!("{}\n{}\n{}", names, scores, verdict))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
