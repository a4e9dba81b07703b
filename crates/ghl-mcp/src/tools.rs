//! MCP tool definitions and results
//!
//! The tool catalogue comes straight from the core registry; this module
//! only shapes it for the wire.

use ghl_core::InvocationResult;
use ghl_core::registry::{self, OperationDescriptor};
use serde::{Deserialize, Serialize};

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl From<&OperationDescriptor> for ToolDefinition {
    fn from(descriptor: &OperationDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            description: descriptor.description.to_string(),
            input_schema: descriptor.input_schema(),
        }
    }
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }
}

impl From<InvocationResult> for ToolResult {
    fn from(result: InvocationResult) -> Self {
        match result {
            InvocationResult::Success { text } => ToolResult::text(text),
            InvocationResult::Failure { text } => ToolResult::error(text),
        }
    }
}

/// Every registered tool, in registry order
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    registry::list().iter().map(ToolDefinition::from).collect()
}
