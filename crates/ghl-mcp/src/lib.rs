//! MCP Server for the GoHighLevel CRM
//!
//! Exposes the `ghl-core` tool catalogue over the Model Context Protocol,
//! so an assistant can search contacts, move opportunities through a
//! pipeline, send messages and manage custom fields.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ ghl-mcp (protocol, tool results) ]
//!        | (Rust API)
//!        v
//! [ ghl-core (registry, dispatcher) ]
//!        | (HTTPS)
//!        v
//! [ GoHighLevel REST API ]
//! ```

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::GhlMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
