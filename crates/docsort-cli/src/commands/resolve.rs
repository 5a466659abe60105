//! Resolve command implementation.

use super::open_registry;
use crate::cli::ResolveArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

/// Execute the resolve command.
pub fn execute_resolve(args: ResolveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    // Collect names from various sources
    let mut names = args.names.clone();

    if let Some(file_path) = &args.file {
        names.extend(read_names_from_file(file_path)?);
    }

    if args.stdin {
        names.extend(read_names_from_stdin()?);
    }

    if names.is_empty() {
        return Err(CliError::InvalidInput("No company names provided".to_string()));
    }

    let merge = !args.no_merge && config.normalization.auto_merge;
    let (report, mut registry) = open_registry(config, merge)?;
    if !report.is_empty() && formatter.format() == OutputFormat::Table {
        println!("{}", formatter.format_report(&report)?);
    }

    let resolutions: Vec<_> = names
        .into_iter()
        .map(|name| {
            let resolution = registry.resolve(&name);
            (name, resolution)
        })
        .collect();

    println!("{}", formatter.format_resolutions(&resolutions)?);
    Ok(())
}

/// Read names from a file (one per line).
fn read_names_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Read names from stdin (one per line).
fn read_names_from_stdin() -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut names = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_names_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Bank of America").unwrap();
        writeln!(file, "").unwrap(); // Empty line should be ignored
        writeln!(file, "  Target Corp  ").unwrap();

        let names = read_names_from_file(file.path()).unwrap();
        assert_eq!(names, vec!["Bank of America", "Target Corp"]);
    }

    #[test]
    fn test_no_names_is_an_error() {
        let args = ResolveArgs {
            names: vec![],
            file: None,
            stdin: false,
            no_merge: true,
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_resolve(args, &Config::default(), &formatter);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
