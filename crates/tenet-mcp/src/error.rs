//! Error types for MCP server operations.

use thiserror::Error;

/// MCP server error types
#[derive(Error, Debug)]
pub enum McpError {
    /// Invalid request format or parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The engine could not be opened
    #[error("Engine error: {0}")]
    Engine(#[from] tenet_engine::EngineError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => -32602,
            McpError::ToolNotFound(_) => -32601,
            McpError::Engine(_) => -32000,
            McpError::Json(_) => -32700,
            McpError::Io(_) => -32000,
        }
    }
}
