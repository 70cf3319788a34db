//! Begrep CLI library.
//!
//! Configuration, command execution and output formatting for the `begrep`
//! command-line tool, which works on a local SQLite catalog database.

pub mod access;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
