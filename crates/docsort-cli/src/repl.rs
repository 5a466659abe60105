//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::commands::open_registry;
use crate::config::{docsort_home, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docsort_domain::{normalize, score, CanonicalEntry};
use docsort_registry::CanonicalRegistry;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
///
/// One registry lives for the whole session, so names resolved earlier
/// are matched by later lines.
pub fn run_repl(config: &Config, formatter: &Formatter) -> Result<()> {
    let (report, mut registry) = open_registry(config, config.normalization.auto_merge)?;
    if !report.is_empty() {
        println!("{}", formatter.format_report(&report)?);
    }

    println!(
        "{}",
        formatter.info("Docsort REPL - Type a company name to resolve it, 'help' for commands, 'exit' to quit")
    );
    println!("{}", formatter.statistics_line(&registry.statistics()));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("docsort> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_line(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, &mut registry, config, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    List,
    Stats,
    Score(String, String),
    Resolve(String),
}

/// Parse a REPL command line.
fn parse_repl_line(line: &str) -> Result<ReplCommand> {
    match line {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        "help" | "?" => return Ok(ReplCommand::Help),
        _ => {}
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        ":list" => Ok(ReplCommand::List),
        ":stats" => Ok(ReplCommand::Stats),
        ":score" => {
            let (a, b) = rest
                .split_once('|')
                .map(|(a, b)| (a.trim(), b.trim()))
                .filter(|(a, b)| !a.is_empty() && !b.is_empty())
                .ok_or_else(|| CliError::InvalidInput("Usage: :score <name a> | <name b>".to_string()))?;
            Ok(ReplCommand::Score(a.to_string(), b.to_string()))
        }
        _ if head.starts_with(':') => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
        _ => Ok(ReplCommand::Resolve(line.to_string())),
    }
}

/// Execute a REPL command.
fn execute_repl_command(
    cmd: ReplCommand,
    registry: &mut CanonicalRegistry,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Exit => {}
        ReplCommand::Help => print_help(formatter),
        ReplCommand::List => {
            let entries: Vec<CanonicalEntry> = registry.entries().into_iter().cloned().collect();
            println!("{}", formatter.format_companies(&entries, &registry.statistics())?);
        }
        ReplCommand::Stats => {
            println!("{}", formatter.statistics_line(&registry.statistics()));
        }
        ReplCommand::Score(a, b) => {
            let a = normalize(&a);
            let b = normalize(&b);
            let breakdown = score(&a.key, &b.key);
            println!(
                "{}",
                formatter.format_score(&a, &b, &breakdown, config.normalization.similarity_threshold)?
            );
        }
        ReplCommand::Resolve(name) => {
            let resolution = registry.resolve(&name);
            println!("{}", formatter.format_resolutions(&[(name, resolution)])?);
        }
    }

    Ok(())
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
}

fn get_history_path() -> Result<PathBuf> {
    let home = docsort_home()?;
    std::fs::create_dir_all(&home)?;
    Ok(home.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <company name>                 - Resolve a name to its canonical folder");
    println!("  :list                          - List known companies");
    println!("  :stats                         - Registry statistics");
    println!("  :score <a> | <b>               - Compare two names");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
