//! Tool catalog and tool calling types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Descriptions longer than this are cut before they reach the model
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Hard cap on function declarations the model API accepts per request
pub const MODEL_FUNCTION_LIMIT: usize = 128;

/// Default number of tools forwarded to the model per query
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Read-only view of a catalog entry
///
/// The relevance filter only needs a name and a description, so it is
/// generic over this trait rather than over a concrete tool type. This
/// lets callers filter the MCP SDK's own tool list without copying it.
pub trait CatalogEntry {
    /// Tool identifier, unique within a catalog snapshot
    fn name(&self) -> &str;

    /// Free-text description (may be empty)
    fn description(&self) -> &str;
}

/// Tool definition as advertised by a tool-providing server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the input parameters, forwarded unmodified
    #[serde(rename = "inputSchema", default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl Tool {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Description cut to [`MAX_DESCRIPTION_CHARS`] characters
    pub fn truncated_description(&self) -> &str {
        truncate_chars(&self.description, MAX_DESCRIPTION_CHARS)
    }
}

impl CatalogEntry for Tool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl CatalogEntry for rmcp::model::Tool {
    fn name(&self) -> &str {
        self.name.as_ref()
    }

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl<T: CatalogEntry + ?Sized> CatalogEntry for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}

impl From<rmcp::model::Tool> for Tool {
    fn from(tool: rmcp::model::Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|s| s.to_string()).unwrap_or_default(),
            // input_schema is Arc<JsonObject>, convert to Value
            input_schema: Some(Value::Object(tool.input_schema.as_ref().clone())),
        }
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Tool call from the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Input arguments for the tool
    pub input: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Parse a tool call whose arguments arrive as a JSON string
    pub fn from_json_arguments(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: &str,
    ) -> Result<Self, serde_json::Error> {
        let input = if arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(arguments)?
        };
        Ok(Self::new(id, name, input))
    }
}

/// Tool result to send back to LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is responding to
    #[serde(rename = "callId")]
    pub call_id: String,
    /// The result content
    pub content: String,
    /// Whether this result represents an error
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: error.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_creation() {
        let tool = Tool::new("list_devices", "List managed devices")
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "adom": { "type": "string" }
                },
                "required": ["adom"]
            }));

        assert_eq!(tool.name, "list_devices");
        assert!(tool.input_schema.is_some());
    }

    #[test]
    fn test_tool_wire_format() {
        let tool: Tool = serde_json::from_value(json!({
            "name": "get_adom",
            "inputSchema": { "type": "object" }
        }))
        .unwrap();

        assert_eq!(tool.description, "");
        assert_eq!(tool.input_schema, Some(json!({ "type": "object" })));

        let value = serde_json::to_value(Tool::new("x", "y")).unwrap();
        assert!(value.get("inputSchema").is_none());
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let text = "é".repeat(1200);
        let cut = truncate_chars(&text, MAX_DESCRIPTION_CHARS);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS);

        assert_eq!(truncate_chars("short", 1000), "short");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_truncated_description() {
        let tool = Tool::new("t", "a".repeat(1500));
        assert_eq!(tool.truncated_description().len(), 1000);
    }

    #[test]
    fn test_tool_call_from_json_arguments() {
        let call = ToolCall::from_json_arguments("call_1", "list_devices", r#"{"adom":"root"}"#).unwrap();
        assert_eq!(call.input["adom"], "root");

        let empty = ToolCall::from_json_arguments("call_2", "list_adoms", "").unwrap();
        assert!(empty.input.as_object().unwrap().is_empty());

        assert!(ToolCall::from_json_arguments("call_3", "x", "{not json").is_err());
    }

    #[test]
    fn test_tool_result() {
        let success = ToolResult::success("call_123", "3 devices");
        assert!(!success.is_error);

        let error = ToolResult::error("call_456", "ADOM not found");
        assert!(error.is_error);
    }
}
