//! MCP (Model Context Protocol) client module
//!
//! Uses the official rmcp SDK to reach a remote tool server over streamable
//! HTTP. `McpClient` implements [`crate::catalog::ToolCatalog`], so the
//! registry can use it without knowing about the transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolsift_core::mcp::{McpClient, ConnectOptions};
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new());
//!
//! let client = McpClient::connect("http://localhost:8000/mcp", ConnectOptions::default(), logger).await?;
//!
//! // List available tools
//! let tools = client.list_tools().await?;
//!
//! // Call a tool
//! let result = client.call_tool("list_devices", json!({ "adom": "root" })).await?;
//! ```

mod client;

pub use client::{McpClient, ConnectOptions};

// Re-export rmcp types that consumers might need
pub use rmcp::model::{Tool as McpTool, CallToolResult as McpToolResult};
