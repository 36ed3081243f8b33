//! Tool-providing collaborator interface
//!
//! The registry and the filter never see transport details; they talk to a
//! [`ToolCatalog`]:
//!
//! - `McpClient` (in [`crate::mcp`]): remote MCP server over streamable HTTP
//! - `MemoryCatalog`: in-process catalog with scripted results, for tests

mod traits;
mod memory;

pub use traits::{ToolCatalog, ToolOutput, CatalogError, CatalogResult};
pub use memory::MemoryCatalog;
