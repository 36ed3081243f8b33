//! MCP Client using the official rmcp SDK
//!
//! Connects to an MCP server over streamable HTTP (JSON-RPC with SSE
//! responses). The handshake is bounded by a timeout and retried a few
//! times before giving up.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation, Tool as McpTool},
    service::RunningService,
    transport::StreamableHttpClientTransport,
    RoleClient,
};
use serde_json::Value;

use crate::catalog::{CatalogError, CatalogResult, ToolCatalog, ToolOutput};
use crate::logging::Logger;
use crate::types::Tool;

/// Connection and request limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Bound on each initialize handshake
    pub connect_timeout: Duration,
    /// Bound on `tools/list` and `tools/call`
    pub request_timeout: Duration,
    /// Handshake attempts before giving up (at least 1)
    pub attempts: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// MCP client for a remote tool-providing server
pub struct McpClient {
    /// The underlying rmcp running service
    client: RunningService<RoleClient, ClientInfo>,
    options: ConnectOptions,
    logger: Arc<dyn Logger>,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "toolsift".to_string(),
            title: Some("toolsift".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

async fn bounded<T, F>(limit: Duration, operation: &str, future: F) -> CatalogResult<T>
where
    F: Future<Output = CatalogResult<T>>,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| CatalogError::Timeout(format!("{} after {:?}", operation, limit)))?
}

/// Run `attempt` up to `options.attempts` times, pausing `retry_delay` between tries
async fn with_retries<T, F, Fut>(
    url: &str,
    options: &ConnectOptions,
    logger: &dyn Logger,
    mut attempt: F,
) -> CatalogResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CatalogResult<T>>,
{
    let attempts = options.attempts.max(1);
    let mut last_error = CatalogError::ConnectionFailed(format!("no attempt made to {}", url));

    for n in 1..=attempts {
        logger.info(&format!("[McpClient] Connecting to {} (attempt {}/{})", url, n, attempts));

        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                logger.warn(&format!("[McpClient] Attempt {} failed: {}", n, e));
                last_error = e;
            }
        }

        if n < attempts {
            tokio::time::sleep(options.retry_delay).await;
        }
    }

    logger.error(&format!("[McpClient] Giving up on {}: {}", url, last_error));
    Err(last_error)
}

impl McpClient {
    /// Connect to an MCP server over HTTP (Streamable HTTP transport)
    pub async fn connect(url: &str, options: ConnectOptions, logger: Arc<dyn Logger>) -> CatalogResult<Self> {
        let connect_timeout = options.connect_timeout;
        let client = with_retries(url, &options, logger.as_ref(), move || async move {
            let transport = StreamableHttpClientTransport::from_uri(url);
            let handshake = async {
                client_info()
                    .serve(transport)
                    .await
                    .map_err(|e| CatalogError::InitializationFailed(e.to_string()))
            };
            bounded(connect_timeout, "initialize", handshake).await
        })
        .await?;

        let client = Self { client, options, logger };
        if let Some(info) = client.server_info() {
            client.logger.info(&format!(
                "[McpClient] Connected to {} v{}",
                info.name, info.version
            ));
        }
        Ok(client)
    }

    /// List all available tools, following pagination
    pub async fn list_tools(&self) -> CatalogResult<Vec<McpTool>> {
        let tools = bounded(self.options.request_timeout, "tools/list", async {
            self.client
                .list_all_tools()
                .await
                .map_err(|e| CatalogError::Protocol(e.to_string()))
        })
        .await?;

        self.logger.info(&format!("[McpClient] Listed {} tools", tools.len()));
        Ok(tools)
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CatalogResult<CallToolResult> {
        self.logger.info(&format!("[McpClient] Calling tool: {}", name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        bounded(self.options.request_timeout, "tools/call", async {
            self.client
                .call_tool(params)
                .await
                .map_err(|e| CatalogError::ToolCallFailed(e.to_string()))
        })
        .await
    }

    /// Get server info
    pub fn server_info(&self) -> Option<&Implementation> {
        self.client.peer_info().map(|info| &info.server_info)
    }

    /// Close the connection
    pub async fn close(self) -> CatalogResult<()> {
        self.logger.info("[McpClient] Closing connection");
        self.client
            .cancel()
            .await
            .map_err(|e| CatalogError::Protocol(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ToolCatalog for McpClient {
    async fn fetch_catalog(&self) -> CatalogResult<Vec<Tool>> {
        Ok(self.list_tools().await?.into_iter().map(Tool::from).collect())
    }

    async fn invoke_tool(&self, name: &str, arguments: Value) -> CatalogResult<ToolOutput> {
        let result = self.call_tool(name, arguments).await?;
        Ok(ToolOutput::from_call_result(&result))
    }
}
