//! Tool registry: the per-session owner of catalog state
//!
//! The ToolRegistry is the central component for:
//! - Fetching the catalog once per session and caching it
//! - Hiding tools by name or enabled state
//! - Selecting the relevant subset for each query
//! - Converting that subset to function declarations for the model
//! - Executing tool calls and returning results

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{CatalogError, ToolCatalog};
use crate::logging::Logger;
use crate::relevance::{CatalogSummary, FilterError, ToolRelevanceFilter};
use crate::types::{
    to_function_declarations, CatalogEntry, FunctionDeclaration, FunctionError, Tool, ToolCall, ToolResult,
    MODEL_FUNCTION_LIMIT,
};
use crate::{log_debug, log_error, log_info, log_warn};

/// Errors surfaced by the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Function(#[from] FunctionError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A cached catalog entry with its session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for tool parameters
    pub input_schema: Option<Value>,
    /// Whether this tool is enabled
    pub enabled: bool,
}

impl From<Tool> for ToolInfo {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name,
            description: tool.description,
            input_schema: tool.input_schema,
            enabled: true,
        }
    }
}

impl From<&ToolInfo> for Tool {
    fn from(info: &ToolInfo) -> Self {
        Tool {
            name: info.name.clone(),
            description: info.description.clone(),
            input_schema: info.input_schema.clone(),
        }
    }
}

impl CatalogEntry for ToolInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Name-based visibility rules applied before relevance filtering
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    /// If set, only include tools with these names
    pub include: Option<HashSet<String>>,
    /// Exclude tools with these names
    pub exclude: HashSet<String>,
    /// Only include enabled tools (default: true)
    pub only_enabled: bool,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self {
            include: None,
            exclude: HashSet::new(),
            only_enabled: true,
        }
    }

    /// Include all tools
    pub fn all() -> Self {
        Self {
            include: None,
            exclude: HashSet::new(),
            only_enabled: false,
        }
    }

    /// Include only specific tools
    pub fn with_include(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.include = Some(names.into_iter().collect());
        self
    }

    /// Exclude specific tools
    pub fn with_exclude(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.exclude = names.into_iter().collect();
        self
    }

    /// Check if a tool matches this filter
    pub fn matches(&self, tool: &ToolInfo) -> bool {
        if self.only_enabled && !tool.enabled {
            return false;
        }

        if self.exclude.contains(&tool.name) {
            return false;
        }

        if let Some(ref include) = self.include {
            if !include.contains(&tool.name) {
                return false;
            }
        }

        true
    }
}

/// Tool registry for one chat session
pub struct ToolRegistry {
    /// Tool-providing collaborator
    catalog: RwLock<Option<Arc<dyn ToolCatalog>>>,
    /// Cached tools from last refresh
    tools: RwLock<Vec<ToolInfo>>,
    /// Set once a refresh has succeeded
    loaded: AtomicBool,
    /// User-configured enabled/disabled state
    tool_states: RwLock<HashMap<String, bool>>,
    /// Visibility rules
    visibility: RwLock<CatalogFilter>,
    /// Relevance tables
    relevance: ToolRelevanceFilter,
    /// Logger
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create a new tool registry without a catalog
    pub fn new(relevance: ToolRelevanceFilter, logger: Arc<dyn Logger>) -> Self {
        Self {
            catalog: RwLock::new(None),
            tools: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
            tool_states: RwLock::new(HashMap::new()),
            visibility: RwLock::new(CatalogFilter::new()),
            relevance,
            logger,
        }
    }

    /// Create a new tool registry with a catalog
    pub fn with_catalog(
        catalog: Arc<dyn ToolCatalog>,
        relevance: ToolRelevanceFilter,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let registry = Self::new(relevance, logger);
        registry.set_catalog(catalog);
        registry
    }

    /// Set the catalog (for lazy initialization); drops the cached tools
    pub fn set_catalog(&self, catalog: Arc<dyn ToolCatalog>) {
        *self.catalog.write() = Some(catalog);
        self.tools.write().clear();
        self.loaded.store(false, Ordering::SeqCst);
    }

    /// Replace the visibility rules
    pub fn set_visibility(&self, filter: CatalogFilter) {
        *self.visibility.write() = filter;
    }

    pub fn relevance(&self) -> &ToolRelevanceFilter {
        &self.relevance
    }

    /// Whether the catalog has been fetched this session
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Fetch the tool list from the catalog and replace the cache
    pub async fn refresh(&self) -> RegistryResult<()> {
        let catalog = self.catalog.read().clone();
        let Some(catalog) = catalog else {
            log_warn!(self.logger, "[ToolRegistry] No tool catalog configured, skipping refresh");
            return Err(CatalogError::NotConnected.into());
        };

        let fetched = match catalog.fetch_catalog().await {
            Ok(tools) => tools,
            Err(e) => {
                log_error!(self.logger, "[ToolRegistry] Failed to fetch tools: {}", e);
                return Err(e.into());
            }
        };

        log_info!(self.logger, "[ToolRegistry] Discovered {} tools", fetched.len());
        if fetched.is_empty() {
            log_warn!(self.logger, "[ToolRegistry] Catalog is empty");
        }

        let new_tools: Vec<ToolInfo> = {
            let states = self.tool_states.read();
            fetched
                .into_iter()
                .map(|tool| {
                    let mut info = ToolInfo::from(tool);
                    if let Some(&enabled) = states.get(&info.name) {
                        info.enabled = enabled;
                    }
                    info
                })
                .collect()
        };

        *self.tools.write() = new_tools;
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Refresh only if the catalog has not been fetched yet
    pub async fn ensure_loaded(&self) -> RegistryResult<()> {
        if self.is_loaded() {
            return Ok(());
        }
        self.refresh().await
    }

    /// Cached tools passing the visibility rules, in catalog order
    pub fn visible_tools(&self) -> Vec<ToolInfo> {
        let visibility = self.visibility.read();
        self.tools
            .read()
            .iter()
            .filter(|t| visibility.matches(t))
            .cloned()
            .collect()
    }

    /// Tools relevant to `query`, at most the configured default count
    pub fn relevant_tools(&self, query: &str) -> RegistryResult<Vec<Tool>> {
        self.relevant_tools_limited(query, self.relevance.config().max_results)
    }

    /// Tools relevant to `query`, at most `max_results`
    pub fn relevant_tools_limited(&self, query: &str, max_results: usize) -> RegistryResult<Vec<Tool>> {
        let visible = self.visible_tools();
        let selected = self.relevance.filter(query, visible.as_slice(), max_results)?;

        log_info!(
            self.logger,
            "[ToolRegistry] Filtered to {} tools from {} total",
            selected.len(),
            visible.len()
        );
        if !selected.is_empty() {
            let top: Vec<&str> = selected.iter().take(5).map(|t| t.name.as_str()).collect();
            log_debug!(self.logger, "[ToolRegistry] Top relevant tools: {:?}", top);
        }

        Ok(selected.into_iter().map(Tool::from).collect())
    }

    /// Function declarations for the model, for this query
    pub fn function_declarations(&self, query: &str) -> RegistryResult<Vec<FunctionDeclaration>> {
        let tools = self.relevant_tools(query)?;
        Ok(to_function_declarations(&tools, MODEL_FUNCTION_LIMIT)?)
    }

    /// Category counts over the cached catalog
    pub fn summary(&self) -> CatalogSummary {
        let tools = self.tools.read();
        self.relevance.summarize_catalog(tools.as_slice())
    }

    /// Enable or disable a tool
    pub fn set_tool_enabled(&self, name: &str, enabled: bool) {
        self.tool_states.write().insert(name.to_string(), enabled);

        let mut tools = self.tools.write();
        if let Some(tool) = tools.iter_mut().find(|t| t.name == name) {
            tool.enabled = enabled;
        }
    }

    /// Execute a tool call from an LLM response
    ///
    /// Never fails: transport errors become error results the model can read.
    pub async fn execute_tool_call(&self, tool_call: &ToolCall) -> ToolResult {
        let catalog = self.catalog.read().clone();
        let outcome = match catalog {
            Some(catalog) => {
                log_info!(self.logger, "[ToolRegistry] Calling tool: {}", tool_call.name);
                catalog.invoke_tool(&tool_call.name, tool_call.input.clone()).await
            }
            None => Err(CatalogError::NotConnected),
        };

        match outcome {
            Ok(output) => ToolResult {
                call_id: tool_call.id.clone(),
                content: output.text,
                is_error: output.is_error,
            },
            Err(e) => {
                let message = format!("Error calling {}: {}", tool_call.name, e);
                log_error!(self.logger, "[ToolRegistry] {}", message);
                ToolResult::error(tool_call.id.clone(), message)
            }
        }
    }

    /// Execute multiple tool calls sequentially, in order
    pub async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            results.push(self.execute_tool_call(call).await);
        }

        results
    }

    /// Get count of cached tools
    pub fn tool_count(&self) -> usize {
        self.tools.read().len()
    }

    /// Get count of tools passing the visibility rules
    pub fn visible_tool_count(&self) -> usize {
        self.visible_tools().len()
    }
}
