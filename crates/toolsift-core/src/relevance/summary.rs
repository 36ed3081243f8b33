//! Per-category tool counts for a catalog

use std::fmt;

use crate::types::CatalogEntry;

use super::tables::RelevanceConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// How a catalog spreads over the configured categories
///
/// A tool whose name matches several categories is counted in each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub total: usize,
    /// Categories in table order; empty categories are kept
    pub categories: Vec<CategoryCount>,
    /// Tools that match no category
    pub uncategorized: usize,
}

impl CatalogSummary {
    pub fn new<T: CatalogEntry>(config: &RelevanceConfig, catalog: &[T]) -> Self {
        let names: Vec<String> = catalog.iter().map(|t| t.name().to_lowercase()).collect();

        let categories = config
            .categories
            .iter()
            .map(|rule| CategoryCount {
                name: rule.name.clone(),
                count: names.iter().filter(|name| rule.matches(name)).count(),
            })
            .collect();

        let uncategorized = names
            .iter()
            .filter(|name| !config.categories.iter().any(|rule| rule.matches(name)))
            .count();

        Self {
            total: catalog.len(),
            categories,
            uncategorized,
        }
    }

    /// Count for one category, if it exists
    pub fn count(&self, category: &str) -> Option<usize> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.count)
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total tools available: {}", self.total)?;
        for category in self.categories.iter().filter(|c| c.count > 0) {
            writeln!(f, "- {}: {} tools", category.name, category.count)?;
        }
        if self.uncategorized > 0 {
            writeln!(f, "- other: {} tools", self.uncategorized)?;
        }
        Ok(())
    }
}
