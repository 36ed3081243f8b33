//! Session tool management
//!
//! The `ToolRegistry` sits between the chat loop and the tool server:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │                                             │
//! │  - Fetches the catalog once per session     │
//! │  - Hides disabled / excluded tools          │
//! │  - Picks the relevant subset per query      │
//! │  - Builds function declarations             │
//! │  - Executes tool calls, errors as results   │
//! └─────────────────────────────────────────────┘
//!           │
//!           │ ToolCatalog (tools/list, tools/call)
//!           ▼
//! ┌─────────────────────────────────────────────┐
//! │  McpClient / MemoryCatalog                  │
//! └─────────────────────────────────────────────┘
//! ```

mod registry;

pub use registry::{CatalogFilter, RegistryError, RegistryResult, ToolInfo, ToolRegistry};
