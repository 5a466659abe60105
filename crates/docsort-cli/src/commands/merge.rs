//! Merge command implementation.

use crate::cli::MergeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docsort_merger::{FolderMerger, MergeConfig};

/// Execute the merge command.
pub fn execute_merge(args: MergeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    // An explicit merge ignores the auto_merge setting
    let merge_config = MergeConfig {
        auto_merge: true,
        dry_run: args.dry_run,
        ..config.merge_config()
    };

    let merger = FolderMerger::new(merge_config)?;
    let outcome = merger.merge_duplicates(&config.output_root)?;

    println!("{}", formatter.format_report(&outcome.report)?);
    Ok(())
}
