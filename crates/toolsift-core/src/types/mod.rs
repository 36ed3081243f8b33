//! Core types shared by the filter, the registry and the bindings

mod tool;
mod function;

pub use tool::{
    CatalogEntry, Tool, ToolCall, ToolResult, truncate_chars,
    MAX_DESCRIPTION_CHARS, MODEL_FUNCTION_LIMIT, DEFAULT_MAX_RESULTS,
};
pub use function::{FunctionDeclaration, FunctionError, to_function_declarations};
