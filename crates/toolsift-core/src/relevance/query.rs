//! Query analysis: keywords, active categories, verbs and entities

use super::tables::{KeywordRule, RelevanceConfig};

/// Everything the scorer needs to know about one query
///
/// Built once per filter call; borrowing the rules from the config keeps
/// scoring allocation-free per tool apart from lowercasing.
#[derive(Debug, Clone)]
pub struct QueryProfile<'c> {
    normalized: String,
    keywords: Vec<String>,
    categories: Vec<&'c KeywordRule>,
    operations: Vec<&'c KeywordRule>,
    entities: Vec<&'c str>,
}

impl<'c> QueryProfile<'c> {
    pub fn analyze(query: &str, config: &'c RelevanceConfig) -> Self {
        let normalized = query.to_lowercase();

        // duplicates are kept: a repeated word counts once per occurrence
        let keywords = normalized
            .split_whitespace()
            .filter(|token| token.chars().count() >= config.min_keyword_len)
            .map(str::to_string)
            .collect();

        let categories = config
            .categories
            .iter()
            .filter(|rule| rule.matches(&normalized))
            .collect();

        let operations = config
            .operations
            .iter()
            .filter(|rule| rule.matches(&normalized))
            .collect();

        let entities = config
            .priority_entities
            .iter()
            .map(String::as_str)
            .filter(|entity| normalized.contains(*entity))
            .collect();

        Self {
            normalized,
            keywords,
            categories,
            operations,
            entities,
        }
    }

    /// Lowercased query text
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Tokens long enough to be matched against names and descriptions
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Categories with at least one trigger in the query
    pub fn categories(&self) -> &[&'c KeywordRule] {
        &self.categories
    }

    /// Names of the active categories, in table order
    pub fn category_names(&self) -> Vec<&'c str> {
        self.categories.iter().map(|rule| rule.name.as_str()).collect()
    }

    /// Operation classes whose synonyms appear in the query
    pub fn operations(&self) -> &[&'c KeywordRule] {
        &self.operations
    }

    /// Priority entities mentioned in the query
    pub fn entities(&self) -> &[&'c str] {
        &self.entities
    }

    /// True when no signal can fire for any tool name or description
    pub fn is_blank(&self) -> bool {
        self.keywords.is_empty()
            && self.categories.is_empty()
            && self.operations.is_empty()
            && self.entities.is_empty()
    }
}
