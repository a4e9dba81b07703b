//! MCP Server implementation
//!
//! Reads newline-delimited JSON-RPC messages, hands tool calls to the
//! core [`Dispatcher`], and writes one response line per request.

use std::sync::Arc;

use ghl_core::Dispatcher;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolsCapability,
};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// MCP Server for the GoHighLevel CRM tools
///
/// # Example
///
/// ```ignore
/// use ghl_core::{Config, Dispatcher};
/// use ghl_mcp::GhlMcpServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let dispatcher = Dispatcher::from_config(&Config::from_env()?)?;
///     GhlMcpServer::new(dispatcher).run().await?;
///     Ok(())
/// }
/// ```
pub struct GhlMcpServer {
    dispatcher: Arc<Dispatcher>,
    tools: Vec<ToolDefinition>,
}

impl GhlMcpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tools: get_tool_definitions(),
        }
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Serve over the process's stdin and stdout until stdin closes
    pub async fn run(self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await?;
        Ok(())
    }

    /// Serve over any line reader and writer.
    ///
    /// Each message is handled on its own task; responses go through a
    /// single writer so lines never interleave. At end of input, in-flight
    /// messages are drained and the writer is handed back.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let server = Arc::new(self);
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<W, std::io::Error>(writer)
        });

        tracing::info!(tools = server.tools.len(), "MCP server ready, listening on stdio");

        let mut in_flight = JoinSet::new();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(bytes = line.len(), "Received message");

            let server = server.clone();
            let tx = tx.clone();
            in_flight.spawn(async move {
                let response = server.handle_message(&line).await;
                if !response.is_empty() {
                    // Receiver only closes after every sender is gone
                    let _ = tx.send(response);
                }
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Message task panicked");
            }
        }
        drop(tx);

        tracing::info!("Input closed, shutting down");
        let writer = writer_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        Ok(writer)
    }

    /// Handle a single MCP message.
    ///
    /// Returns the serialized response, or an empty string for
    /// notifications.
    pub async fn handle_message(&self, message: &str) -> String {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                return encode(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification");
            return String::new();
        }

        let id = request.id.clone();
        let response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(Error::InvalidParams(message)) => {
                JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", message))
            }
            Err(e) => {
                tracing::error!(error = %e, "Request handling failed");
                JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {}", e))
            }
        };
        encode(response)
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => Ok(JsonRpcResponse::success(request.id, json!({}))),
            "tools/list" => Ok(self.handle_tools_list(request.id)),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => Ok(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "ghl-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tools }))
    }

    /// Tool failures are successful responses carrying `isError: true`
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams =
            serde_json::from_value(params).map_err(|e| Error::InvalidParams(e.to_string()))?;

        let result = self.dispatcher.invoke(&params.name, params.arguments).await;
        let tool_result = ToolResult::from(result);
        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }
}

fn encode(response: JsonRpcResponse) -> String {
    serde_json::to_string(&response).unwrap_or_else(|e| {
        // Fallback is a fixed, always-valid document
        tracing::error!(error = %e, "Response serialization failed");
        format!(
            r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"Internal error"}}}}"#,
            INTERNAL_ERROR
        )
    })
}
