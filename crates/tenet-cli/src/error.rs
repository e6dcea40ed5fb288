//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine error (precondition, rejection, storage)
    #[error("{0}")]
    Engine(#[from] tenet_engine::EngineError),

    /// MCP server error
    #[error("MCP server error: {0}")]
    Mcp(#[from] tenet_mcp::McpError),

    /// Janitor error
    #[error("{0}")]
    Janitor(#[from] tenet_janitor::JanitorError),

    /// Store error
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
