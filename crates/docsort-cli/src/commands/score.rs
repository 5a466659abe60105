//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docsort_domain::{normalize, score};

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let a = normalize(&args.a);
    let b = normalize(&args.b);
    let breakdown = score(&a.key, &b.key);

    println!(
        "{}",
        formatter.format_score(&a, &b, &breakdown, config.normalization.similarity_threshold)?
    );
    Ok(())
}
