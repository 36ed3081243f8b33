//! Configuration provider trait

use async_trait::async_trait;

use crate::relevance::RelevanceConfig;

/// Source of relevance tables
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: YAML file (~/.config/toolsift/relevance.yaml)
#[async_trait]
pub trait RelevanceConfigProvider: Send + Sync {
    /// Human-readable name of the source (for logs)
    fn describe(&self) -> String;

    /// Load the tables, `None` if this source has nothing configured
    async fn load(&self) -> ConfigResult<Option<RelevanceConfig>>;

    /// Persist the tables to this source
    async fn save(&self, config: &RelevanceConfig) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid relevance config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
