//! Function declarations handed to the model's function-calling API

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

use super::tool::{truncate_chars, Tool, MAX_DESCRIPTION_CHARS};

/// Errors raised while building a function list for the model
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FunctionError {
    /// More declarations than the model API accepts
    #[error("{count} functions exceed the model limit of {limit}")]
    TooManyFunctions { count: usize, limit: usize },
}

/// A single function declaration in the OpenAI-style shape
///
/// Serializes as `{"type": "function", "function": {name, description, parameters}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl FunctionDeclaration {
    /// Build a declaration from a catalog tool
    ///
    /// The description is cut to [`MAX_DESCRIPTION_CHARS`] characters and a
    /// missing schema becomes an empty object schema.
    pub fn from_tool(tool: &Tool) -> Self {
        Self {
            name: tool.name.clone(),
            description: truncate_chars(&tool.description, MAX_DESCRIPTION_CHARS).to_string(),
            parameters: tool
                .input_schema
                .clone()
                .unwrap_or_else(empty_parameters),
        }
    }
}

fn empty_parameters() -> Value {
    json!({ "type": "object", "properties": {} })
}

impl Serialize for FunctionDeclaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Function<'a> {
            name: &'a str,
            description: &'a str,
            parameters: &'a Value,
        }

        let mut state = serializer.serialize_struct("FunctionDeclaration", 2)?;
        state.serialize_field("type", "function")?;
        state.serialize_field(
            "function",
            &Function {
                name: &self.name,
                description: &self.description,
                parameters: &self.parameters,
            },
        )?;
        state.end()
    }
}

/// Convert tools to function declarations, refusing to exceed `limit`
pub fn to_function_declarations<'a, I>(tools: I, limit: usize) -> Result<Vec<FunctionDeclaration>, FunctionError>
where
    I: IntoIterator<Item = &'a Tool>,
{
    let declarations: Vec<FunctionDeclaration> = tools.into_iter().map(FunctionDeclaration::from_tool).collect();

    if declarations.len() > limit {
        return Err(FunctionError::TooManyFunctions {
            count: declarations.len(),
            limit,
        });
    }

    Ok(declarations)
}
