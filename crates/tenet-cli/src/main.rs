//! Tenet CLI - Command-line interface for evidence-gated reasoning cycles.

use clap::Parser;
use colored::Colorize;
use tenet_cli::commands;
use tenet_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> tenet_cli::Result<()> {
    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format, !cli.no_color);
    let root = cli.root.as_path();

    let output = match cli.command {
        Command::Serve => {
            commands::execute_serve(root)?;
            return Ok(());
        }
        Command::Init => commands::execute_init(root, &formatter)?,
        Command::Status => commands::execute_status(root, &formatter)?,
        Command::Reliability(args) => commands::execute_reliability(args, root, &formatter)?,
        Command::Tree(args) => commands::execute_tree(args, root, &formatter)?,
        Command::Decay(args) => commands::execute_decay(args, root, &formatter)?,
        Command::Watch(args) => commands::execute_watch(args, root, &formatter)?,
        Command::Waive(args) => commands::execute_waive(args, root, &formatter)?,
        Command::Actualize => commands::execute_actualize(root, &formatter)?,
        Command::Log(args) => commands::execute_log(args, root, &formatter)?,
    };

    println!("{}", output);
    Ok(())
}
