use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// MCP protocol version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProtocolVersion {
    #[serde(rename = "2024-11-05")]
    V2024_11_05,
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V2024_11_05
    }
}

/// Server capabilities advertised during initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged", default)]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesCapability {
    #[serde(default)]
    pub subscribe: bool,
    #[serde(rename = "listChanged", default)]
    pub list_changed: bool,
}

/// Implementation information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Initialization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: ProtocolVersion,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: Implementation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// MCP Tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

/// Tool execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<JsonValue>,
}

/// Tool execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: Some(true),
        }
    }
}

/// Content structure for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Resource definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Resource read request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReference {
    pub uri: String,
}

/// One entry in a resources/read result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_serializes_with_camel_case_schema_key() {
        let tool = Tool {
            name: "add_expense".to_string(),
            description: "Add a new expense entry".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string" }
                }
            }),
        };

        let serialized = serde_json::to_string(&tool).unwrap();
        assert!(serialized.contains(r#""inputSchema""#));
        assert!(!serialized.contains(r#""input_schema""#));

        let deserialized: Tool = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.name, "add_expense");
    }

    #[test]
    fn test_initialize_result_wire_names() {
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
                name: "spendlog".to_string(),
                version: "0.1.0".to_string(),
            },
            instructions: None,
        };

        let serialized = serde_json::to_string(&result).unwrap();
        assert!(serialized.contains(r#""protocolVersion":"2024-11-05""#));
        assert!(serialized.contains(r#""serverInfo""#));
        assert!(serialized.contains(r#""listChanged""#));
        assert!(!serialized.contains(r#""instructions""#));
    }

    #[test]
    fn test_tool_result_error_flag() {
        let ok = ToolResult::text("{\"status\":\"ok\"}");
        let serialized = serde_json::to_string(&ok).unwrap();
        assert!(!serialized.contains("isError"));

        let err = ToolResult::error("Database error");
        let serialized = serde_json::to_string(&err).unwrap();
        assert!(serialized.contains(r#""isError":true"#));
    }

    #[test]
    fn test_resource_wire_names() {
        let resource = Resource {
            uri: "expense://categories".to_string(),
            name: "categories".to_string(),
            description: Some("Allowed expense categories".to_string()),
            mime_type: Some("application/json".to_string()),
        };

        let serialized = serde_json::to_string(&resource).unwrap();
        assert!(serialized.contains(r#""mimeType":"application/json""#));

        let contents = ResourceContents {
            uri: "expense://categories".to_string(),
            mime_type: "application/json".to_string(),
            text: "[]".to_string(),
        };
        let serialized = serde_json::to_string(&contents).unwrap();
        assert!(serialized.contains(r#""mimeType""#));
    }

    #[test]
    fn test_tool_call_deserialization() {
        let call: ToolCall = serde_json::from_str(
            r#"{"name":"list_expenses","arguments":{"start_date":"2024-01-01","end_date":"2024-01-31"}}"#,
        )
        .unwrap();

        assert_eq!(call.name, "list_expenses");
        assert!(call.arguments.is_some());

        let bare: ToolCall = serde_json::from_str(r#"{"name":"list_expenses"}"#).unwrap();
        assert!(bare.arguments.is_none());
    }
}
