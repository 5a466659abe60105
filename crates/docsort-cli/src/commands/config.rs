//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docsort_domain::validate_threshold;
use std::path::{Path, PathBuf};

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path, formatter),
        ConfigAction::SetRoot { path: root } => set_root(config, path, root, formatter),
        ConfigAction::SetThreshold { value } => set_threshold(config, path, value, formatter),
        ConfigAction::Enable => set_normalization(config, path, true, formatter),
        ConfigAction::Disable => set_normalization(config, path, false, formatter),
    }
}

/// Show the configuration and where it lives.
fn show_config(config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        _ => {
            let contents = toml::to_string_pretty(config)
                .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", formatter.info(&format!("Config file: {}", path.display())));
            println!("{}", contents);
        }
    }
    Ok(())
}

fn set_root(config: &mut Config, path: &Path, root: PathBuf, formatter: &Formatter) -> Result<()> {
    config.output_root = root;
    config.save_to(path)?;
    println!(
        "{}",
        formatter.success(&format!("Output root set to {}", config.output_root.display()))
    );
    Ok(())
}

fn set_threshold(config: &mut Config, path: &Path, value: f64, formatter: &Formatter) -> Result<()> {
    let value = validate_threshold(value).map_err(CliError::InvalidInput)?;
    config.normalization.similarity_threshold = value;
    config.save_to(path)?;
    println!(
        "{}",
        formatter.success(&format!("Similarity threshold set to {:.2}", value))
    );
    Ok(())
}

fn set_normalization(config: &mut Config, path: &Path, enabled: bool, formatter: &Formatter) -> Result<()> {
    config.normalization.enabled = enabled;
    config.save_to(path)?;
    let state = if enabled { "enabled" } else { "disabled" };
    println!("{}", formatter.success(&format!("Name normalization {}", state)));
    Ok(())
}
