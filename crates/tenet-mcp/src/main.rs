//! Tenet MCP Server - Main entry point

use std::env;
use std::path::PathBuf;
use tenet_mcp::McpServer;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let root = env::var("TENET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    let mut server = match McpServer::open(&root) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to open Tenet project at {}: {}", root.display(), e);
            std::process::exit(1);
        }
    };

    // Blocks until stdin closes
    if let Err(e) = server.run() {
        eprintln!("MCP server error: {}", e);
        std::process::exit(1);
    }
}
