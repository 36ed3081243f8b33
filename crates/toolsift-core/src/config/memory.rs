//! In-memory relevance configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::relevance::RelevanceConfig;
use super::traits::{ConfigResult, RelevanceConfigProvider};

/// In-memory configuration provider for testing
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<Option<RelevanceConfig>>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider holding `config`
    pub fn with_config(config: RelevanceConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }

    /// Drop the stored config
    pub fn clear(&self) {
        *self.config.write() = None;
    }
}

#[async_trait]
impl RelevanceConfigProvider for MemoryConfigProvider {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn load(&self) -> ConfigResult<Option<RelevanceConfig>> {
        Ok(self.config.read().clone())
    }

    async fn save(&self, config: &RelevanceConfig) -> ConfigResult<()> {
        config.validate()?;
        *self.config.write() = Some(config.clone());
        Ok(())
    }
}
