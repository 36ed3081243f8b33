//! File-based relevance configuration (YAML)
//!
//! Supports user-level (~/.config/toolsift/relevance.yaml) and workspace-level
//! (.config/toolsift/relevance.yaml) files.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::relevance::RelevanceConfig;
use super::traits::{ConfigResult, RelevanceConfigProvider};

const CONFIG_DIR: &str = "toolsift";
const CONFIG_FILE: &str = "relevance.yaml";

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/toolsift/relevance.yaml)
    User,
    /// Workspace-level config (.config/toolsift/relevance.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based relevance config provider
///
/// A missing file is not an error: `load` returns `None` so the resolver
/// can fall through to the next source.
///
/// # Example
///
/// ```no_run
/// use toolsift_core::config::FileConfigProvider;
///
/// // User-level config
/// let user_config = FileConfigProvider::user();
///
/// // Workspace-level config
/// let workspace_config = FileConfigProvider::workspace("/path/to/workspace");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }

    /// Create a user-level config provider (~/.config/toolsift/relevance.yaml)
    pub fn user() -> Self {
        // XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join(CONFIG_DIR).join(CONFIG_FILE), ConfigLevel::User)
    }

    /// Create a workspace-level config provider (.config/toolsift/relevance.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join(CONFIG_DIR).join(CONFIG_FILE);
        Self::new(path, ConfigLevel::Workspace)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the config level
    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<Option<RelevanceConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        RelevanceConfig::from_yaml(&content).map(Some)
    }

    fn write(&self, config: &RelevanceConfig) -> ConfigResult<()> {
        config.validate()?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, config.to_yaml()?)?;
        Ok(())
    }

    /// Write the built-in tables to this path as an editable starting point
    ///
    /// Returns `false` without touching anything if the file already exists.
    pub fn init_from_builtin(&self) -> ConfigResult<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.write(&RelevanceConfig::builtin()?)?;
        Ok(true)
    }

    /// Create a backup of the current config file
    pub fn backup(&self) -> ConfigResult<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }

        let backup_path = self.path.with_extension("yaml.backup");
        fs::copy(&self.path, &backup_path)?;
        Ok(Some(backup_path))
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl RelevanceConfigProvider for FileConfigProvider {
    fn describe(&self) -> String {
        format!("{} config {}", self.level.as_str(), self.path.display())
    }

    async fn load(&self) -> ConfigResult<Option<RelevanceConfig>> {
        self.read()
    }

    async fn save(&self, config: &RelevanceConfig) -> ConfigResult<()> {
        self.write(config)
    }
}
