//! Bounded tool-relevance filter
//!
//! Scores every catalog entry against a query, keeps the ones that score,
//! sorts them (stable, so equal scores keep catalog order) and truncates.
//! When nothing scores, a read-biased fallback set is returned instead.

use thiserror::Error;

use crate::config::ConfigResult;
use crate::types::CatalogEntry;

use super::query::QueryProfile;
use super::summary::CatalogSummary;
use super::tables::RelevanceConfig;

/// Caller contract violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Requested more tools than the model API accepts
    #[error("max_results {requested} exceeds the limit of {ceiling}")]
    LimitExceeded { requested: usize, ceiling: usize },
}

pub type FilterResult<T> = Result<T, FilterError>;

/// Points contributed by each signal for one tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub category: u32,
    pub keyword: u32,
    pub operation: u32,
    pub entity: u32,
    pub pinned: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.category + self.keyword + self.operation + self.entity + self.pinned
    }
}

/// A catalog entry that scored above zero
#[derive(Debug, Clone, Copy)]
pub struct ScoredTool<'a, T> {
    pub tool: &'a T,
    /// Position of `tool` in the catalog that was ranked
    pub index: usize,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Pure, stateless relevance filter over a catalog
///
/// Holds only the validated tables; safe to share across threads and call
/// concurrently.
#[derive(Debug, Clone)]
pub struct ToolRelevanceFilter {
    config: RelevanceConfig,
}

impl ToolRelevanceFilter {
    /// Validate `config` and build a filter around it
    pub fn new(config: RelevanceConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Filter using the embedded tables
    pub fn builtin() -> ConfigResult<Self> {
        Self::new(RelevanceConfig::builtin()?)
    }

    pub fn config(&self) -> &RelevanceConfig {
        &self.config
    }

    /// Analyze a query against this filter's tables
    pub fn profile<'c>(&'c self, query: &str) -> QueryProfile<'c> {
        QueryProfile::analyze(query, &self.config)
    }

    /// Select at most `max_results` tools relevant to `query`
    ///
    /// Output borrows from `catalog` and is ordered by descending score,
    /// ties in catalog order. `max_results == 0` yields an empty list.
    pub fn filter<'a, T: CatalogEntry>(
        &self,
        query: &str,
        catalog: &'a [T],
        max_results: usize,
    ) -> FilterResult<Vec<&'a T>> {
        Ok(self
            .filter_indices(query, catalog, max_results)?
            .into_iter()
            .map(|index| &catalog[index])
            .collect())
    }

    /// Same selection as [`filter`](Self::filter), as positions in `catalog`
    ///
    /// Lets bindings hand back the caller's own objects.
    pub fn filter_indices<T: CatalogEntry>(
        &self,
        query: &str,
        catalog: &[T],
        max_results: usize,
    ) -> FilterResult<Vec<usize>> {
        if max_results > self.config.max_results_ceiling {
            return Err(FilterError::LimitExceeded {
                requested: max_results,
                ceiling: self.config.max_results_ceiling,
            });
        }
        if max_results == 0 || catalog.is_empty() {
            return Ok(Vec::new());
        }

        let ranked = self.rank(query, catalog);
        if ranked.is_empty() {
            return Ok(self.fallback(catalog, max_results));
        }

        Ok(ranked
            .into_iter()
            .take(max_results)
            .map(|scored| scored.index)
            .collect())
    }

    /// [`filter`](Self::filter) with the configured default size
    pub fn filter_default<'a, T: CatalogEntry>(&self, query: &str, catalog: &'a [T]) -> FilterResult<Vec<&'a T>> {
        self.filter(query, catalog, self.config.max_results)
    }

    /// Per-category tool counts for `catalog`
    pub fn summarize_catalog<T: CatalogEntry>(&self, catalog: &[T]) -> CatalogSummary {
        CatalogSummary::new(&self.config, catalog)
    }

    /// Every tool that scores above zero, best first
    pub fn rank<'a, T: CatalogEntry>(&self, query: &str, catalog: &'a [T]) -> Vec<ScoredTool<'a, T>> {
        let profile = self.profile(query);
        if profile.is_blank() && self.config.pinned_tools.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredTool<'a, T>> = catalog
            .iter()
            .enumerate()
            .filter_map(|(index, tool)| {
                let breakdown = self.score(&profile, tool);
                let score = breakdown.total();
                (score > 0).then_some(ScoredTool { tool, index, score, breakdown })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Score one tool against an analyzed query
    pub fn score<T: CatalogEntry + ?Sized>(&self, profile: &QueryProfile<'_>, tool: &T) -> ScoreBreakdown {
        let weights = &self.config.weights;
        let name = tool.name().to_lowercase();
        let description = tool.description().to_lowercase();
        let mut breakdown = ScoreBreakdown::default();

        for category in profile.categories() {
            if category.matches(&name) {
                breakdown.category += weights.category_name;
            }
            if category.matches(&description) {
                breakdown.category += weights.category_description;
            }
        }

        for keyword in profile.keywords() {
            if name.contains(keyword.as_str()) {
                breakdown.keyword += weights.keyword_name;
            }
            if description.contains(keyword.as_str()) {
                breakdown.keyword += weights.keyword_description;
            }
        }

        for operation in profile.operations() {
            if operation.matches(&name) {
                breakdown.operation += weights.operation;
            }
        }

        for entity in profile.entities() {
            if name.contains(*entity) {
                breakdown.entity += weights.entity;
            }
        }

        if self.config.pinned_tools.iter().any(|pinned| pinned == tool.name()) {
            breakdown.pinned += weights.pinned;
        }

        breakdown
    }

    fn fallback<T: CatalogEntry>(&self, catalog: &[T], max_results: usize) -> Vec<usize> {
        let policy = &self.config.fallback;
        if !policy.enabled {
            return Vec::new();
        }

        catalog
            .iter()
            .enumerate()
            .filter(|(_, tool)| {
                let name = tool.name().to_lowercase();
                policy.name_contains.iter().any(|verb| name.contains(verb.as_str()))
            })
            .map(|(index, _)| index)
            .take(max_results)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relevance::tables::{FallbackPolicy, KeywordRule};
    use crate::types::Tool;

    fn catalog(names: &[&str]) -> Vec<Tool> {
        names.iter().map(|name| Tool::new(*name, "")).collect()
    }

    fn names<'a>(tools: &[&'a Tool]) -> Vec<&'a str> {
        tools.iter().copied().map(|t| t.name.as_str()).collect()
    }

    fn builtin() -> ToolRelevanceFilter {
        ToolRelevanceFilter::builtin().unwrap()
    }

    #[test]
    fn test_list_devices_ranks_first() {
        let tools = catalog(&["list_devices", "create_policy", "list_policy_packages"]);
        let filter = builtin();

        let result = filter.filter("list all devices", &tools, 2).unwrap();
        assert_eq!(names(&result), ["list_devices", "list_policy_packages"]);
    }

    #[test]
    fn test_score_breakdown() {
        let filter = builtin();
        let profile = filter.profile("list all devices");

        let breakdown = filter.score(&profile, &Tool::new("list_devices", ""));
        assert_eq!(breakdown.category, 15);
        // "list" and "devices" both in the name
        assert_eq!(breakdown.keyword, 20);
        assert_eq!(breakdown.operation, 8);
        assert_eq!(breakdown.entity, 12);
        assert_eq!(breakdown.pinned, 0);
        assert_eq!(breakdown.total(), 55);

        let other = filter.score(&profile, &Tool::new("list_policy_packages", ""));
        assert_eq!(other.total(), 18);

        assert_eq!(filter.score(&profile, &Tool::new("create_policy", "")).total(), 0);
    }

    #[test]
    fn test_description_signals() {
        let filter = builtin();
        let profile = filter.profile("firmware upgrade");

        let tool = Tool::new("upgrade_image", "Upgrade the device firmware image");
        let breakdown = filter.score(&profile, &tool);

        // category "device" via "firmware" in the description
        assert_eq!(breakdown.category, 5);
        // "upgrade" in name (10) and description (3), "firmware" in description (3)
        assert_eq!(breakdown.keyword, 16);
    }

    #[test]
    fn test_unrelated_query_without_read_tools_is_empty() {
        let tools = catalog(&["create_address", "create_vpn"]);
        let result = builtin()
            .filter("show me something unrelated to anything", &tools, 10)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_query_falls_back_to_read_tools() {
        let tools = catalog(&["list_devices", "create_policy", "get_device_status"]);
        let result = builtin().filter("", &tools, 10).unwrap();
        assert_eq!(names(&result), ["list_devices", "get_device_status"]);
    }

    #[test]
    fn test_fallback_is_bounded() {
        let tools = catalog(&["list_a", "list_b", "list_c"]);
        let result = builtin().filter("", &tools, 2).unwrap();
        assert_eq!(names(&result), ["list_a", "list_b"]);
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let mut config = RelevanceConfig::builtin().unwrap();
        config.fallback = FallbackPolicy {
            enabled: false,
            name_contains: vec![],
        };
        let filter = ToolRelevanceFilter::new(config).unwrap();

        let tools = catalog(&["list_devices"]);
        assert!(filter.filter("", &tools, 10).unwrap().is_empty());
    }

    #[test]
    fn test_zero_max_results() {
        let tools = catalog(&["list_devices"]);
        assert!(builtin().filter("list all devices", &tools, 0).unwrap().is_empty());
        assert!(builtin().filter("", &tools, 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let tools: Vec<Tool> = Vec::new();
        assert!(builtin().filter("list all devices", &tools, 10).unwrap().is_empty());
        assert!(builtin().filter("", &tools, 10).unwrap().is_empty());
    }

    #[test]
    fn test_limit_exceeded() {
        let tools = catalog(&["list_devices"]);
        let err = builtin().filter("devices", &tools, 129).unwrap_err();
        assert_eq!(err, FilterError::LimitExceeded { requested: 129, ceiling: 128 });

        assert!(builtin().filter("devices", &tools, 128).is_ok());
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let tools = catalog(&["get_vpn_b", "get_vpn_a", "get_vpn_c"]);
        let result = builtin().filter("vpn", &tools, 10).unwrap();
        assert_eq!(names(&result), ["get_vpn_b", "get_vpn_a", "get_vpn_c"]);
    }

    #[test]
    fn test_duplicate_names_are_independent() {
        let tools = catalog(&["list_devices", "list_devices"]);
        let result = builtin().filter("list devices", &tools, 10).unwrap();

        assert_eq!(result.len(), 2);
        assert!(std::ptr::eq(result[0], &tools[0]));
        assert!(std::ptr::eq(result[1], &tools[1]));
    }

    #[test]
    fn test_blank_query_still_ranks_pinned_tools() {
        let mut config = RelevanceConfig::builtin().unwrap();
        config.pinned_tools = vec!["list_adoms".to_string()];
        let filter = ToolRelevanceFilter::new(config).unwrap();
        let tools = catalog(&["create_address", "list_adoms"]);

        assert!(builtin().rank("", &tools).is_empty());

        let ranked = filter.rank("", &tools);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tool.name, "list_adoms");
        assert_eq!(ranked[0].breakdown.pinned, 50);
    }

    #[test]
    fn test_pinned_tool_always_included() {
        let mut config = RelevanceConfig::builtin().unwrap();
        config.pinned_tools = vec!["list_adoms".to_string()];
        let filter = ToolRelevanceFilter::new(config).unwrap();

        let tools = catalog(&["create_vpn_tunnel", "update_vpn_tunnel", "list_adoms"]);
        let result = filter.filter("create a vpn tunnel", &tools, 2).unwrap();

        // 65 for the exact match, 50 pinned, 47 for update_vpn_tunnel
        assert_eq!(names(&result), ["create_vpn_tunnel", "list_adoms"]);
    }

    #[test]
    fn test_custom_tables() {
        let config = RelevanceConfig {
            categories: vec![KeywordRule::new("storage", ["bucket", "volume"])],
            ..RelevanceConfig::default()
        };
        let filter = ToolRelevanceFilter::new(config).unwrap();

        let tools = catalog(&["delete_volume", "list_buckets", "ping"]);
        let result = filter.filter("which bucket is largest", &tools, 10).unwrap();

        // category hit (15) plus keyword "bucket" in the name (10); "volume"
        // is a storage trigger too, so delete_volume gets the category hit only
        assert_eq!(names(&result), ["list_buckets", "delete_volume"]);
        assert_eq!(filter.rank("which bucket is largest", &tools)[0].score, 25);
    }

    #[test]
    fn test_filter_default_uses_configured_size() {
        let tools: Vec<Tool> = (0..150).map(|i| Tool::new(format!("list_thing_{i}"), "")).collect();
        let filter = builtin();

        assert_eq!(filter.filter_default("list things", &tools).unwrap().len(), 100);

        let widest = ToolRelevanceFilter::new(RelevanceConfig {
            max_results: 128,
            ..RelevanceConfig::builtin().unwrap()
        })
        .unwrap();
        let many: Vec<Tool> = (0..200).map(|i| Tool::new(format!("list_thing_{i}"), "")).collect();
        assert_eq!(widest.filter_default("list things", &many).unwrap().len(), 128);
    }

    #[test]
    fn test_rank_reports_all_scored_tools() {
        let tools = catalog(&["list_devices", "create_policy", "list_policy_packages"]);
        let ranked = builtin().rank("list all devices", &tools);

        let scores: Vec<(&str, u32)> = ranked.iter().map(|s| (s.tool.name.as_str(), s.score)).collect();
        assert_eq!(scores, [("list_devices", 55), ("list_policy_packages", 18)]);
    }

    #[test]
    fn test_filter_indices_point_into_catalog() {
        let tools = catalog(&["create_policy", "list_policy_packages", "list_devices"]);
        let filter = builtin();

        assert_eq!(filter.filter_indices("list all devices", &tools, 2).unwrap(), [2, 1]);
        assert_eq!(filter.rank("list all devices", &tools)[0].index, 2);

        // fallback keeps positions as well
        let plain = catalog(&["reboot_unit", "get_status", "list_things"]);
        assert_eq!(filter.filter_indices("xyzzy", &plain, 5).unwrap(), [1, 2]);

        assert!(filter.filter_indices("list", &plain, 500).is_err());
    }

    #[test]
    fn test_filters_sdk_tools() {
        use std::sync::Arc;

        let schema = serde_json::Map::new();
        let sdk_tools = vec![
            rmcp::model::Tool::new("list_devices", "List devices", Arc::new(schema.clone())),
            rmcp::model::Tool::new("create_vpn", "Create a VPN", Arc::new(schema)),
        ];

        let result = builtin().filter("list devices", &sdk_tools, 10).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "list_devices");
    }
}
