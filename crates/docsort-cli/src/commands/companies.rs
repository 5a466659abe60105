//! Companies command implementation.

use super::open_registry;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docsort_domain::CanonicalEntry;

/// Execute the companies command.
pub fn execute_companies(config: &Config, formatter: &Formatter) -> Result<()> {
    let (_, registry) = open_registry(config, false)?;
    let entries: Vec<CanonicalEntry> = registry.entries().into_iter().cloned().collect();

    println!(
        "{}",
        formatter.format_companies(&entries, &registry.statistics())?
    );
    Ok(())
}
