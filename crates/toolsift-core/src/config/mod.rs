//! Relevance configuration sources
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory for testing
//! - `FileConfigProvider`: YAML file-based (user/workspace level)
//!
//! [`crate::resolver::ConfigResolver`] picks the winning source.

mod traits;
mod memory;
mod file;

pub use traits::{RelevanceConfigProvider, ConfigError, ConfigResult};
pub use memory::MemoryConfigProvider;
pub use file::{FileConfigProvider, ConfigLevel};
