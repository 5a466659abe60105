//! Docsort CLI - Company folder deduplication and name resolution.

use clap::Parser;
use docsort_cli::commands;
use docsort_cli::repl;
use docsort_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over -v
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> docsort_cli::Result<()> {
    // Load config (defaults if the file does not exist yet)
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    tracing::debug!(path = %config_path.display(), "Loaded configuration");

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // One-run overrides; config edits still apply to the file as stored
    let mut effective = config.clone();
    effective.apply_overrides(cli.root, cli.threshold, cli.disable_normalization)?;

    match cli.command {
        None | Some(Command::Repl) => repl::run_repl(&effective, &formatter),
        Some(Command::Merge(args)) => commands::execute_merge(args, &effective, &formatter),
        Some(Command::Resolve(args)) => commands::execute_resolve(args, &effective, &formatter),
        Some(Command::Companies) => commands::execute_companies(&effective, &formatter),
        Some(Command::Score(args)) => commands::execute_score(args, &effective, &formatter),
        Some(Command::Config(args)) => {
            commands::execute_config(args, &mut config, &config_path, &formatter)
        }
    }
}
