//! In-memory tool catalog

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::types::Tool;
use super::traits::{CatalogError, CatalogResult, ToolCatalog, ToolOutput};

/// In-memory catalog with scripted tool results
///
/// Tools without a scripted result echo their arguments back as JSON.
/// Every invocation is recorded so tests can assert on call order.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tools: RwLock<Vec<Tool>>,
    results: RwLock<HashMap<String, Result<ToolOutput, String>>>,
    calls: RwLock<Vec<(String, Value)>>,
    fetches: AtomicUsize,
    fail_fetch: RwLock<Option<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with `tools`
    pub fn with_tools(tools: Vec<Tool>) -> Self {
        let catalog = Self::new();
        *catalog.tools.write() = tools;
        catalog
    }

    /// Replace the tool list
    pub fn set_tools(&self, tools: Vec<Tool>) {
        *self.tools.write() = tools;
    }

    /// Script the output of a tool
    pub fn set_result(&self, name: impl Into<String>, output: ToolOutput) {
        self.results.write().insert(name.into(), Ok(output));
    }

    /// Script a transport-level failure for a tool
    pub fn set_failure(&self, name: impl Into<String>, message: impl Into<String>) {
        self.results.write().insert(name.into(), Err(message.into()));
    }

    /// Make `fetch_catalog` fail (or succeed again with `None`)
    pub fn set_fetch_failure(&self, message: Option<String>) {
        *self.fail_fetch.write() = message;
    }

    /// Invocations so far, in order
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.read().clone()
    }

    /// How many times the catalog was fetched
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolCatalog for MemoryCatalog {
    async fn fetch_catalog(&self) -> CatalogResult<Vec<Tool>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_fetch.read().clone() {
            return Err(CatalogError::ConnectionFailed(message));
        }
        Ok(self.tools.read().clone())
    }

    async fn invoke_tool(&self, name: &str, arguments: Value) -> CatalogResult<ToolOutput> {
        if !self.tools.read().iter().any(|t| t.name == name) {
            return Err(CatalogError::UnknownTool(name.to_string()));
        }

        self.calls.write().push((name.to_string(), arguments.clone()));

        match self.results.read().get(name) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(CatalogError::ToolCallFailed(message.clone())),
            None => Ok(ToolOutput::text(arguments.to_string())),
        }
    }
}
