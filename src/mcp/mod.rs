pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod types;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use resources::{CategoryResource, CATEGORIES_URI};
pub use server::{McpServer, StdioTransport, Transport};
pub use tools::ExpenseTools;
pub use types::{
    Content, Implementation, InitializeResult, ProtocolVersion, Resource, ResourceContents,
    ServerCapabilities, Tool, ToolCall, ToolResult,
};
