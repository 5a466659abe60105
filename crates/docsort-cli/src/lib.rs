//! Docsort CLI library.
//!
//! This library provides the core functionality for the `docsort` command-line
//! interface: configuration management, command execution, and output formatting
//! on top of the registry and merger crates.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
