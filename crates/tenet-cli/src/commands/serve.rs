//! MCP server over stdio.

use crate::error::Result;
use std::path::Path;
use tenet_mcp::McpServer;

/// Execute the serve command; blocks until stdin closes.
pub fn execute_serve(root: &Path) -> Result<()> {
    let mut server = McpServer::open(root)?;
    server.run()?;
    Ok(())
}
