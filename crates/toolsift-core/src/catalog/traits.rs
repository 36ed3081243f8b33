//! Catalog trait, tool output and errors

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::Tool;

/// Placeholder text for image content in a tool result
pub const IMAGE_PLACEHOLDER: &str = "[Image Returned]";

/// Text used when a tool succeeds without returning content
pub const EMPTY_OUTPUT: &str = "Tool executed successfully with no output.";

/// Errors from a tool-providing collaborator
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("No tool catalog configured")]
    NotConnected,

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Flattened result of a tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// All text parts joined with newlines
    pub text: String,
    /// The tool reported a failure
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Flatten an MCP `tools/call` result
    pub fn from_call_result(result: &rmcp::model::CallToolResult) -> Self {
        use rmcp::model::RawContent;

        let parts: Vec<String> = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                RawContent::Image(_) => Some(IMAGE_PLACEHOLDER.to_string()),
                _ => None,
            })
            .collect();

        let text = if parts.is_empty() {
            EMPTY_OUTPUT.to_string()
        } else {
            parts.join("\n")
        };

        Self {
            text,
            is_error: result.is_error.unwrap_or(false),
        }
    }
}

/// A source of callable tools
///
/// The catalog is fetched once per session and cached by the caller; the
/// implementation does not need to cache.
#[async_trait]
pub trait ToolCatalog: Send + Sync {
    /// Fetch the complete tool list
    async fn fetch_catalog(&self) -> CatalogResult<Vec<Tool>>;

    /// Invoke a tool by name with JSON object arguments
    async fn invoke_tool(&self, name: &str, arguments: Value) -> CatalogResult<ToolOutput>;
}
