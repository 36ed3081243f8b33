//! toolsift core
//!
//! Bounded tool selection for LLM function calling.
//! MCP servers can expose hundreds of tools while model APIs accept a
//! limited number of function declarations per request. This crate picks
//! the subset relevant to each user query and is usable from any
//! environment (Python via PyO3, native CLI, etc.)
//!
//! ## Relevance filtering
//!
//! The `relevance` module is pure and synchronous:
//!
//! ```rust,ignore
//! use toolsift_core::{Tool, ToolRelevanceFilter};
//!
//! let filter = ToolRelevanceFilter::builtin()?;
//! let catalog = vec![Tool::new("list_devices", "List managed devices")];
//!
//! let selected = filter.filter("list all devices", &catalog, 20)?;
//! ```
//!
//! ## Session orchestration
//!
//! The `tools` module wraps a catalog source for one chat session:
//!
//! ```rust,ignore
//! use toolsift_core::{ConfigResolver, McpClient, ConnectOptions, ToolRegistry};
//!
//! let resolved = ConfigResolver::standard(Some(&workspace), logger.clone()).resolve().await?;
//! let client = McpClient::connect(url, ConnectOptions::default(), logger.clone()).await?;
//!
//! let registry = ToolRegistry::with_catalog(Arc::new(client), resolved.into_filter()?, logger);
//! registry.refresh().await?;
//!
//! // Declarations for this query
//! let functions = registry.function_declarations(&user_message)?;
//!
//! // Execute tool calls from LLM response
//! let results = registry.execute_tool_calls(&tool_calls).await;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod resolver;
pub mod relevance;
pub mod catalog;
pub mod mcp;
pub mod tools;

// Re-export commonly used types
pub use types::{
    CatalogEntry, Tool, ToolCall, ToolResult,
    FunctionDeclaration, FunctionError, to_function_declarations,
    MAX_DESCRIPTION_CHARS, MODEL_FUNCTION_LIMIT, DEFAULT_MAX_RESULTS,
};

pub use logging::{Logger, NoOpLogger, ConsoleLogger, MemoryLogger, LogLevel};

pub use config::{
    RelevanceConfigProvider, ConfigError, ConfigResult,
    FileConfigProvider, MemoryConfigProvider, ConfigLevel,
};

pub use resolver::{ConfigResolver, ConfigOrigin, ResolvedConfig};

pub use relevance::{
    RelevanceConfig, ToolRelevanceFilter, FilterError, FilterResult,
    ScoredTool, ScoreBreakdown, QueryProfile, CatalogSummary,
};

pub use catalog::{ToolCatalog, ToolOutput, CatalogError, CatalogResult, MemoryCatalog};

// MCP client using official rmcp SDK
pub use mcp::{McpClient, ConnectOptions, McpTool, McpToolResult};

pub use tools::{ToolRegistry, CatalogFilter, ToolInfo, RegistryError, RegistryResult};
