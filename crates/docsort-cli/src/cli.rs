//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Docsort - Deduplicate company folders and resolve company names.
#[derive(Debug, Parser)]
#[command(name = "docsort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DOCSORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output root holding one folder per company
    #[arg(short, long, global = true, env = "DOCSORT_OUTPUT_ROOT")]
    pub root: Option<PathBuf>,

    /// Similarity threshold (0.0-1.0) for this run
    #[arg(short, long, global = true)]
    pub threshold: Option<f64>,

    /// Exact literal matching only, for this run
    #[arg(long, global = true)]
    pub disable_normalization: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (folder names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge duplicate company folders under the output root
    Merge(MergeArgs),

    /// Resolve raw company names to canonical folders
    Resolve(ResolveArgs),

    /// List known companies
    Companies,

    /// Show how two names score against each other
    Score(ScoreArgs),

    /// Inspect or edit the configuration file
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the merge command.
#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// Report what would be merged without moving anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Raw company names
    pub names: Vec<String>,

    /// Read names from file (one per line)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read names from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// Seed from the existing folders without merging duplicates first
    #[arg(long)]
    pub no_merge: bool,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// First name
    pub a: String,

    /// Second name
    pub b: String,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Set the output root
    SetRoot {
        /// Directory holding company folders
        path: PathBuf,
    },

    /// Set the similarity threshold
    SetThreshold {
        /// Value in 0.0-1.0
        value: f64,
    },

    /// Turn name normalization on
    Enable,

    /// Turn name normalization off (exact matching)
    Disable,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["docsort"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_resolve_command() {
        let cli = Cli::parse_from([
            "docsort",
            "resolve",
            "Bank of America",
            "BANK_OF_AMERICA",
            "--no-merge",
            "-t",
            "0.8",
        ]);
        assert_eq!(cli.threshold, Some(0.8));
        match cli.command {
            Some(Command::Resolve(args)) => {
                assert_eq!(args.names.len(), 2);
                assert!(args.no_merge);
                assert!(!args.stdin);
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "docsort",
            "-vv",
            "--format",
            "json",
            "--disable-normalization",
            "merge",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.disable_normalization);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Some(Command::Merge(MergeArgs { dry_run: true }))));
    }

    #[test]
    fn test_config_set_threshold() {
        let cli = Cli::parse_from(["docsort", "config", "set-threshold", "0.9"]);
        match cli.command {
            Some(Command::Config(ConfigArgs {
                action: ConfigAction::SetThreshold { value },
            })) => assert_eq!(value, 0.9),
            _ => panic!("Expected config set-threshold"),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
