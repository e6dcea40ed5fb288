//! MCP server implementation

use serde_json::{json, Value};
use std::fmt::Display;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tenet_domain::traits::ArtifactStore;
use tenet_engine::Engine;
use tenet_store::SqliteStore;
use tracing::{debug, error, info, warn};

use crate::error::McpError;
use crate::protocol::*;
use crate::tools;

/// MCP Server
///
/// Handles Model Context Protocol requests via stdio transport, executing
/// each tool call as one engine command.
pub struct McpServer<S: ArtifactStore> {
    engine: Engine<S>,
}

impl McpServer<SqliteStore> {
    /// Open the project rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, McpError> {
        Ok(Self::new(Engine::open(root)?))
    }
}

impl<S: ArtifactStore> McpServer<S>
where
    S::Error: Display,
{
    /// Wrap an engine
    pub fn new(engine: Engine<S>) -> Self {
        Self { engine }
    }

    /// The engine serving tool calls
    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    /// Run the MCP server (stdio transport)
    ///
    /// Reads JSON-RPC requests from stdin and writes responses to stdout
    /// until stdin closes.
    pub fn run(&mut self) -> Result<(), McpError> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        self.serve(BufReader::new(stdin.lock()), &mut stdout)
    }

    /// Serve newline-delimited requests from `reader`, one response line per request
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, writer: &mut W) -> Result<(), McpError> {
        info!(context = self.engine.context_id(), "MCP server started");

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            debug!("Received request: {}", line);

            if let Some(response) = self.handle_line(&line) {
                write_response(writer, &response)?;
            }
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw request line; notifications produce no response
    pub fn handle_line(&mut self, line: &str) -> Option<Value> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                error!("Failed to parse request: {}", e);
                Some(JsonRpcError::new(None, -32700, format!("Parse error: {}", e)).into_value())
            }
        }
    }

    /// Handle a JSON-RPC request
    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<Value> {
        if request.jsonrpc != "2.0" {
            warn!(version = %request.jsonrpc, "unexpected JSON-RPC version");
        }

        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::new(id, initialize_result()).into_value(),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params),
            "ping" => JsonRpcResponse::new(id, json!({})).into_value(),
            _ => JsonRpcError::new(id, -32601, format!("Method not found: {}", request.method))
                .into_value(),
        };
        Some(response)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> Value {
        match serde_json::to_value(tools::definitions()) {
            Ok(list) => JsonRpcResponse::new(id, json!({ "tools": list })).into_value(),
            Err(e) => JsonRpcError::new(id, -32603, e.to_string()).into_value(),
        }
    }

    fn handle_tool_call(&mut self, id: Option<Value>, params: Value) -> Value {
        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name.to_string(),
            None => {
                return JsonRpcError::new(id, -32602, "Missing tool name".to_string()).into_value();
            }
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let command = match tools::parse_call(&tool_name, arguments) {
            Ok(command) => command,
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "rejected tool call");
                return JsonRpcError::new(id, e.error_code(), e.to_string()).into_value();
            }
        };

        let result = match self.engine.execute(command) {
            Ok(text) => CallToolResult::text(text),
            Err(e) => CallToolResult::error(e.to_string()),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::new(id, value).into_value(),
            Err(e) => JsonRpcError::new(id, -32603, e.to_string()).into_value(),
        }
    }
}

/// Write one response line and flush
fn write_response<W: Write>(writer: &mut W, response: &Value) -> Result<(), McpError> {
    let response_str = serde_json::to_string(response)?;
    writeln!(writer, "{}", response_str)?;
    writer.flush()?;
    debug!("Sent response: {}", response_str);
    Ok(())
}
