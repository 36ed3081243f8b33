//! Resolvers that merge multiple sources into one effective value
//!
//! - `ConfigResolver`: picks the relevance tables (workspace > user > built-in)

mod config_resolver;

pub use config_resolver::{ConfigResolver, ConfigOrigin, ResolvedConfig};
