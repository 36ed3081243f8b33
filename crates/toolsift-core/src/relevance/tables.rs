//! Relevance tables: categories, operation classes, entities and weights
//!
//! These are data, not code. The built-in set is embedded from
//! `default_tables.yaml`; deployments replace it with their own file
//! through [`crate::config`].

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};
use crate::types::{DEFAULT_MAX_RESULTS, MODEL_FUNCTION_LIMIT};

const BUILTIN_TABLES: &str = include_str!("default_tables.yaml");

static BUILTIN: Lazy<Result<RelevanceConfig, String>> = Lazy::new(|| {
    RelevanceConfig::from_yaml(BUILTIN_TABLES).map_err(|e| e.to_string())
});

/// A named group of lowercase trigger keywords
///
/// Used both for categories ("device" => device, firmware, vdom, ...) and
/// for operation classes ("list" => list, get, show, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// True if any keyword is a substring of `haystack` (already lowercased)
    pub fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|kw| haystack.contains(kw.as_str()))
    }
}

/// Points awarded per signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Active category keyword in the tool name
    pub category_name: u32,
    /// Active category keyword in the tool description
    pub category_description: u32,
    /// Query keyword in the tool name
    pub keyword_name: u32,
    /// Query keyword in the tool description
    pub keyword_description: u32,
    /// Query verb and tool-name verb share an operation class
    pub operation: u32,
    /// Priority entity in both query and tool name
    pub entity: u32,
    /// Tool is pinned
    pub pinned: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category_name: 15,
            category_description: 5,
            keyword_name: 10,
            keyword_description: 3,
            operation: 8,
            entity: 12,
            pinned: 50,
        }
    }
}

/// What to return when no tool scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    pub enabled: bool,
    /// Tools whose lowercased name contains any of these are returned
    pub name_contains: Vec<String>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            name_contains: vec!["list".to_string(), "get".to_string()],
        }
    }
}

/// Complete relevance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelevanceConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Default size of the filtered tool list
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Largest `max_results` a caller may ask for
    #[serde(default = "default_ceiling")]
    pub max_results_ceiling: usize,
    /// Query tokens shorter than this (in chars) are not keywords
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub categories: Vec<KeywordRule>,
    #[serde(default)]
    pub operations: Vec<KeywordRule>,
    #[serde(default)]
    pub priority_entities: Vec<String>,
    /// Exact tool names that always receive the pinned bonus
    #[serde(default)]
    pub pinned_tools: Vec<String>,
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

fn default_version() -> u32 {
    1
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_ceiling() -> usize {
    MODEL_FUNCTION_LIMIT
}

fn default_min_keyword_len() -> usize {
    3
}

impl Default for RelevanceConfig {
    /// Scalar defaults with empty tables
    fn default() -> Self {
        Self {
            version: default_version(),
            max_results: default_max_results(),
            max_results_ceiling: default_ceiling(),
            min_keyword_len: default_min_keyword_len(),
            weights: ScoreWeights::default(),
            categories: Vec::new(),
            operations: Vec::new(),
            priority_entities: Vec::new(),
            pinned_tools: Vec::new(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl RelevanceConfig {
    /// The embedded FortiManager tables
    pub fn builtin() -> ConfigResult<Self> {
        (*BUILTIN).clone().map_err(ConfigError::Invalid)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&KeywordRule> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Check the tables for mistakes that would silently break matching
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_results == 0 {
            return Err(invalid("max_results must be at least 1"));
        }
        if self.max_results_ceiling > MODEL_FUNCTION_LIMIT {
            return Err(invalid(format!(
                "max_results_ceiling ({}) exceeds the model function limit ({})",
                self.max_results_ceiling, MODEL_FUNCTION_LIMIT
            )));
        }
        if self.max_results > self.max_results_ceiling {
            return Err(invalid(format!(
                "max_results ({}) exceeds max_results_ceiling ({})",
                self.max_results, self.max_results_ceiling
            )));
        }
        if self.min_keyword_len == 0 {
            return Err(invalid("min_keyword_len must be at least 1"));
        }

        validate_rules("categories", &self.categories)?;
        validate_rules("operations", &self.operations)?;
        validate_keywords("priority_entities", &self.priority_entities)?;
        validate_keywords("fallback.name_contains", &self.fallback.name_contains)?;

        if self.pinned_tools.iter().any(|name| name.trim().is_empty()) {
            return Err(invalid("pinned_tools: empty tool name"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn validate_rules(section: &str, rules: &[KeywordRule]) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.name.trim().is_empty() {
            return Err(invalid(format!("{section}: entry with empty name")));
        }
        if !seen.insert(rule.name.as_str()) {
            return Err(invalid(format!("{section}: duplicate name '{}'", rule.name)));
        }
        if rule.keywords.is_empty() {
            return Err(invalid(format!("{section}.{}: no keywords", rule.name)));
        }
        validate_keywords(&format!("{section}.{}", rule.name), &rule.keywords)?;
    }
    Ok(())
}

fn validate_keywords(section: &str, keywords: &[String]) -> ConfigResult<()> {
    for kw in keywords {
        if kw.trim().is_empty() {
            return Err(invalid(format!("{section}: empty keyword")));
        }
        if *kw != kw.to_lowercase() {
            return Err(invalid(format!("{section}: keyword '{kw}' must be lowercase")));
        }
    }
    Ok(())
}
