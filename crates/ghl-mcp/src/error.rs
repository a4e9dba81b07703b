//! Error types for the MCP server

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving the protocol
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the core dispatcher or configuration
    #[error(transparent)]
    Core(#[from] ghl_core::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request params do not match the method
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// IO error on the stdio transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
