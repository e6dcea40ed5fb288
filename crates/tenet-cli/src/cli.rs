//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tenet CLI - Evidence-gated reasoning cycles for a project.
#[derive(Debug, Parser)]
#[command(name = "tenet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root (the directory holding `.tenet/`)
    #[arg(short, long, global = true, env = "TENET_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text and tables (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the MCP protocol over stdio
    Serve,

    /// Create the project layout and open the first cycle
    Init,

    /// Show phase, active role and tier counts
    Status,

    /// Compute the reliability score of an artifact
    Reliability(ArtifactArgs),

    /// Render the reliability computation of an artifact as a tree
    Tree(ArtifactArgs),

    /// Recompute every cached reliability score once
    Decay(DecayArgs),

    /// Recompute scores periodically until interrupted
    Watch(WatchArgs),

    /// Waive one evidence record until a deadline
    Waive(WaiveArgs),

    /// Reconcile with git and report changed files
    Actualize,

    /// Show recent audit log entries
    Log(LogArgs),
}

/// Arguments naming one artifact.
#[derive(Debug, Parser)]
pub struct ArtifactArgs {
    /// Artifact identifier
    pub id: String,
}

/// Arguments for the decay command.
#[derive(Debug, Parser)]
pub struct DecayArgs {
    /// Compute scores without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Minutes between passes (overrides `[janitor] sweep_interval_minutes`)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Compute scores without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the waive command.
#[derive(Debug, Parser)]
pub struct WaiveArgs {
    /// Evidence record to waive
    pub evidence_id: String,

    /// Who grants the waiver
    #[arg(short, long)]
    pub by: String,

    /// Deadline (RFC3339 or YYYY-MM-DD)
    #[arg(short, long)]
    pub until: String,

    /// Why the evidence may be ignored
    #[arg(short, long)]
    pub rationale: String,
}

/// Arguments for the log command.
#[derive(Debug, Parser)]
pub struct LogArgs {
    /// Maximum number of entries, newest first
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}
