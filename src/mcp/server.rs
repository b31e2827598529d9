use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::mcp::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::resources::{CategoryResource, CATEGORIES_URI};
use crate::mcp::tools::ExpenseTools;
use crate::mcp::types::{
    Implementation, InitializeResult, ProtocolVersion, ResourceReference, ResourcesCapability,
    ServerCapabilities, ToolCall, ToolsCapability,
};
use crate::storage::ExpenseRepository;

/// Transport abstraction separating line framing from protocol handling
#[async_trait]
pub trait Transport: Send {
    /// Receive the next message line, or None once the peer disconnects
    async fn receive(&mut self) -> Result<Option<String>>;

    /// Send a single message line
    async fn send(&mut self, line: &str) -> Result<()>;
}

/// Stdio transport: newline-delimited JSON-RPC over stdin/stdout, the
/// framing MCP clients use when they spawn the server as a child process.
pub struct StdioTransport {
    reader: BufReader<Stdin>,
    writer: Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn receive(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            debug!("Client closed stdin");
            return Ok(None);
        }
        Ok(Some(line))
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// MCP server exposing the expense store as tools and the category list as
/// a read-only resource.
pub struct McpServer {
    tools: ExpenseTools,
    categories: CategoryResource,
    name: String,
    instructions: Option<String>,
}

impl McpServer {
    pub fn new(
        repository: ExpenseRepository,
        categories: CategoryResource,
        name: impl Into<String>,
        instructions: Option<String>,
    ) -> Self {
        Self {
            tools: ExpenseTools::new(repository),
            categories,
            name: name.into(),
            instructions,
        }
    }

    /// Serve requests until the transport reports end of input.
    pub async fn run<T: Transport>(&self, transport: &mut T) -> Result<()> {
        info!("MCP server {} ready", self.name);

        while let Some(line) = transport.receive().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line).await {
                transport.send(&response).await?;
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle one message line. Returns the serialized response, or None
    /// for notifications, which are never answered.
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let request = match JsonRpcRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Unparseable request: {}", e);
                let response =
                    JsonRpcResponse::error(JsonValue::Null, JsonRpcError::parse_error());
                return serialize_response(response);
            }
        };

        if request.is_notification() {
            debug!("Ignoring notification: {}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(JsonValue::Null);
        let response = match self.dispatch(&request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        };

        serialize_response(response)
    }

    async fn dispatch(
        &self,
        request: &JsonRpcRequest,
    ) -> std::result::Result<JsonValue, JsonRpcError> {
        debug!("Handling request: {}", request.method);

        match request.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: ProtocolVersion::default(),
                    capabilities: ServerCapabilities {
                        tools: Some(ToolsCapability {
                            list_changed: false,
                        }),
                        resources: Some(ResourcesCapability {
                            subscribe: false,
                            list_changed: false,
                        }),
                    },
                    server_info: Implementation {
                        name: self.name.clone(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                    instructions: self.instructions.clone(),
                };
                to_result_value(&result)
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": ExpenseTools::catalog() })),
            "tools/call" => {
                let call: ToolCall = parse_params(request)?;
                let result = self.tools.call(&call).await?;
                to_result_value(&result)
            }
            "resources/list" => Ok(json!({ "resources": [self.categories.descriptor()] })),
            "resources/read" => {
                let reference: ResourceReference = parse_params(request)?;
                if reference.uri != CATEGORIES_URI {
                    return Err(JsonRpcError::invalid_params(&format!(
                        "Unknown resource: {}",
                        reference.uri
                    )));
                }
                let contents = self
                    .categories
                    .read()
                    .await
                    .map_err(|e| JsonRpcError::internal_error(&e.to_string()))?;
                Ok(json!({ "contents": [contents] }))
            }
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    request: &JsonRpcRequest,
) -> std::result::Result<T, JsonRpcError> {
    let params = request.params.clone().unwrap_or(JsonValue::Null);
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(&e.to_string()))
}

fn to_result_value<T: serde::Serialize>(
    value: &T,
) -> std::result::Result<JsonValue, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(&e.to_string()))
}

fn serialize_response(response: JsonRpcResponse) -> Option<String> {
    match response.serialize() {
        Ok(serialized) => Some(serialized),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            None
        }
    }
}
