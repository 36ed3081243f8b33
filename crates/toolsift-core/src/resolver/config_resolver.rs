//! Resolution of the relevance tables from multiple sources
//!
//! Source priority (first source with a config wins, as a whole):
//! 1. Workspace YAML (.config/toolsift/relevance.yaml)
//! 2. User YAML (~/.config/toolsift/relevance.yaml)
//! 3. Built-in tables embedded in the crate
//!
//! A source that exists but fails to parse or validate is an error; it is
//! never skipped silently.

use std::path::Path;
use std::sync::Arc;

use crate::config::{ConfigResult, FileConfigProvider, RelevanceConfigProvider};
use crate::logging::Logger;
use crate::relevance::{RelevanceConfig, ToolRelevanceFilter};

/// Where the resolved tables came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// A provider, identified by its description
    Provider(String),
    /// The embedded default tables
    Builtin,
}

impl std::fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigOrigin::Provider(source) => write!(f, "{}", source),
            ConfigOrigin::Builtin => write!(f, "built-in tables"),
        }
    }
}

/// Resolved tables with source tracking
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: RelevanceConfig,
    pub origin: ConfigOrigin,
}

impl ResolvedConfig {
    /// Build a filter from the resolved tables
    pub fn into_filter(self) -> ConfigResult<ToolRelevanceFilter> {
        ToolRelevanceFilter::new(self.config)
    }
}

/// Resolves relevance tables across providers in priority order
pub struct ConfigResolver {
    providers: Vec<Arc<dyn RelevanceConfigProvider>>,
    logger: Arc<dyn Logger>,
}

impl ConfigResolver {
    /// Resolver with no providers: always yields the built-in tables
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            providers: Vec::new(),
            logger,
        }
    }

    /// Workspace file (if a root is given), then user file, then built-in
    pub fn standard(workspace_root: Option<&Path>, logger: Arc<dyn Logger>) -> Self {
        let mut resolver = Self::new(logger);
        if let Some(root) = workspace_root {
            resolver = resolver.with_provider(Arc::new(FileConfigProvider::workspace(root)));
        }
        resolver.with_provider(Arc::new(FileConfigProvider::user()))
    }

    /// Append a provider with lower priority than those already added
    pub fn with_provider(mut self, provider: Arc<dyn RelevanceConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Number of providers consulted before the built-in tables
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Resolve the tables from the highest-priority source that has them
    pub async fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        for provider in &self.providers {
            let source = provider.describe();
            match provider.load().await {
                Ok(Some(config)) => {
                    config.validate()?;
                    self.logger.info(&format!("[ConfigResolver] Using relevance tables from {}", source));
                    return Ok(ResolvedConfig {
                        config,
                        origin: ConfigOrigin::Provider(source),
                    });
                }
                Ok(None) => {
                    self.logger.debug(&format!("[ConfigResolver] No relevance tables in {}", source));
                }
                Err(e) => {
                    self.logger.error(&format!("[ConfigResolver] Failed to load {}: {}", source, e));
                    return Err(e);
                }
            }
        }

        self.logger.info("[ConfigResolver] Using built-in relevance tables");
        Ok(ResolvedConfig {
            config: RelevanceConfig::builtin()?,
            origin: ConfigOrigin::Builtin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigLevel, MemoryConfigProvider};
    use crate::logging::NoOpLogger;
    use crate::relevance::KeywordRule;
    use tempfile::tempdir;

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn storage_config() -> RelevanceConfig {
        RelevanceConfig {
            categories: vec![KeywordRule::new("storage", ["bucket"])],
            ..RelevanceConfig::default()
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_builtin() {
        let resolver = ConfigResolver::new(logger())
            .with_provider(Arc::new(MemoryConfigProvider::new()));

        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::Builtin);
        assert_eq!(resolved.config, RelevanceConfig::builtin().unwrap());
    }

    #[tokio::test]
    async fn test_first_source_wins() {
        let high = Arc::new(MemoryConfigProvider::with_config(storage_config()));
        let low = Arc::new(MemoryConfigProvider::with_config(RelevanceConfig::builtin().unwrap()));

        let resolver = ConfigResolver::new(logger())
            .with_provider(high)
            .with_provider(low);

        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::Provider("memory".to_string()));
        assert_eq!(resolved.config.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_workspace_overrides_user() {
        let workspace = tempdir().unwrap();
        let user = tempdir().unwrap();

        let workspace_provider = FileConfigProvider::workspace(workspace.path());
        workspace_provider.save(&storage_config()).await.unwrap();

        let user_provider = FileConfigProvider::new(user.path().join("relevance.yaml"), ConfigLevel::User);
        user_provider.init_from_builtin().unwrap();

        let resolver = ConfigResolver::new(logger())
            .with_provider(Arc::new(workspace_provider))
            .with_provider(Arc::new(user_provider));

        let resolved = resolver.resolve().await.unwrap();
        assert!(resolved.origin.to_string().starts_with("workspace config"));

        let filter = resolved.into_filter().unwrap();
        assert_eq!(filter.config().categories[0].name, "storage");
    }

    #[tokio::test]
    async fn test_broken_source_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relevance.yaml");
        std::fs::write(&path, "max_results: [not a number]\n").unwrap();

        let resolver = ConfigResolver::new(logger())
            .with_provider(Arc::new(FileConfigProvider::new(&path, ConfigLevel::User)));

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_standard_sources() {
        let dir = tempdir().unwrap();
        assert_eq!(ConfigResolver::standard(Some(dir.path()), logger()).provider_count(), 2);
        assert_eq!(ConfigResolver::standard(None, logger()).provider_count(), 1);
    }
}
