//! Tenet CLI library.
//!
//! Argument parsing, output formatting and the command implementations
//! behind the `tenet` binary. Every command opens the project at `--root`
//! and runs through the same engine the MCP server uses, so CLI actions
//! land in the audit log like any other.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
