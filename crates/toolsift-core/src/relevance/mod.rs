//! Query-aware tool selection
//!
//! A tool-providing server can expose far more tools (590+ for FortiManager)
//! than a model API accepts per request (128). The [`ToolRelevanceFilter`]
//! picks a bounded, ranked subset for each user query:
//!
//! ```text
//!   query ──► QueryProfile ──┐
//!                            ├─► score every tool ─► drop zeros ─► stable sort ─► take N
//!   catalog ─────────────────┘                          │
//!                                                       └─ nothing scored ─► list/get fallback
//! ```
//!
//! Signals (default weights): active category keyword in the tool name (+15)
//! or description (+5), query keyword in the name (+10) or description (+3),
//! matching operation class (+8), priority entity in query and name (+12),
//! pinned tool (+50). All tables live in [`RelevanceConfig`].

mod tables;
mod query;
mod filter;
mod summary;

pub use tables::{RelevanceConfig, KeywordRule, ScoreWeights, FallbackPolicy};
pub use query::QueryProfile;
pub use filter::{ToolRelevanceFilter, FilterError, FilterResult, ScoredTool, ScoreBreakdown};
pub use summary::{CatalogSummary, CategoryCount};
