//! Tenet MCP Server
//!
//! Model Context Protocol server exposing the Tenet reasoning cycle to AI
//! clients over stdio. Each tool (`tenet_propose`, `tenet_verify`,
//! `tenet_decide`, ...) executes one engine command; tool failures come
//! back as results flagged `isError` so the client can read the reason and
//! the suggested remedy.
//!
//! # Example
//!
//! ```no_run
//! use tenet_mcp::McpServer;
//!
//! let mut server = McpServer::open(".").unwrap();
//! server.run().unwrap();
//! ```

#![warn(missing_docs)]

mod error;
pub mod protocol;
mod server;
pub mod tools;

pub use error::McpError;
pub use server::McpServer;
