//! Python bindings for toolsift via PyO3

use std::path::PathBuf;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use toolsift_core::{
    to_function_declarations, CatalogEntry, ConfigError, FilterError, FunctionError, RelevanceConfig,
    Tool as CoreTool, ToolRelevanceFilter as CoreRelevanceFilter, DEFAULT_MAX_RESULTS, MAX_DESCRIPTION_CHARS,
    MODEL_FUNCTION_LIMIT,
};

fn config_err(e: ConfigError) -> PyErr {
    match e {
        ConfigError::Invalid(_) | ConfigError::Yaml(_) => PyValueError::new_err(e.to_string()),
        ConfigError::Io(_) => PyRuntimeError::new_err(e.to_string()),
    }
}

fn filter_err(e: FilterError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn function_err(e: FunctionError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ============================================================================
// Tool Types
// ============================================================================

/// Tool definition
///
/// Immutable, so filters can read it through a shared handle.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct Tool {
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub description: String,
    #[pyo3(get)]
    pub input_schema: Option<String>, // JSON string
}

#[pymethods]
impl Tool {
    #[new]
    #[pyo3(signature = (name, description=String::new(), input_schema=None))]
    pub fn new(name: String, description: String, input_schema: Option<String>) -> Self {
        Self { name, description, input_schema }
    }

    fn __repr__(&self) -> String {
        format!("Tool(name='{}')", self.name)
    }
}

impl Tool {
    fn to_core(&self) -> PyResult<CoreTool> {
        let tool = CoreTool::new(self.name.clone(), self.description.clone());
        match &self.input_schema {
            Some(schema) => {
                let value = serde_json::from_str(schema).map_err(|e| {
                    PyValueError::new_err(format!("invalid input_schema for '{}': {}", self.name, e))
                })?;
                Ok(tool.with_schema(value))
            }
            None => Ok(tool),
        }
    }
}

impl CatalogEntry for Tool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Borrow the tools behind the caller's handles without copying them
fn views(tools: &[Py<Tool>]) -> Vec<&Tool> {
    tools.iter().map(Py::get).collect()
}

/// Run the selection and return the caller's own handles, best first
fn select(
    py: Python<'_>,
    filter: &CoreRelevanceFilter,
    query: &str,
    tools: &[Py<Tool>],
    max_results: usize,
) -> PyResult<Vec<Py<Tool>>> {
    let indices = filter
        .filter_indices(query, &views(tools), max_results)
        .map_err(filter_err)?;
    Ok(indices.into_iter().map(|index| tools[index].clone_ref(py)).collect())
}

// ============================================================================
// RelevanceFilter
// ============================================================================

/// Query-aware tool selection over a catalog
#[pyclass]
pub struct RelevanceFilter {
    inner: CoreRelevanceFilter,
}

#[pymethods]
impl RelevanceFilter {
    /// Use the built-in tables, or the YAML tables at `config_path`
    #[new]
    #[pyo3(signature = (config_path=None))]
    pub fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    PyRuntimeError::new_err(format!("cannot read {}: {}", path.display(), e))
                })?;
                RelevanceConfig::from_yaml(&content).map_err(config_err)?
            }
            None => RelevanceConfig::builtin().map_err(config_err)?,
        };

        let inner = CoreRelevanceFilter::new(config).map_err(config_err)?;
        Ok(Self { inner })
    }

    #[getter]
    pub fn max_results(&self) -> usize {
        self.inner.config().max_results
    }

    #[getter]
    pub fn max_results_ceiling(&self) -> usize {
        self.inner.config().max_results_ceiling
    }

    /// Relevant tools, best first; `max_results` defaults to the configured size
    ///
    /// Returns the same objects that were passed in, not copies.
    #[pyo3(signature = (query, tools, max_results=None))]
    pub fn filter(
        &self,
        py: Python<'_>,
        query: &str,
        tools: Vec<Py<Tool>>,
        max_results: Option<usize>,
    ) -> PyResult<Vec<Py<Tool>>> {
        let limit = max_results.unwrap_or(self.inner.config().max_results);
        select(py, &self.inner, query, &tools, limit)
    }

    /// Every scoring tool as `(name, score)`, best first
    pub fn rank(&self, query: &str, tools: Vec<Py<Tool>>) -> Vec<(String, u32)> {
        self.inner
            .rank(query, &views(&tools))
            .into_iter()
            .map(|scored| (scored.tool.name.clone(), scored.score))
            .collect()
    }

    /// Categories the query activates, in table order
    pub fn categories(&self, query: &str) -> Vec<String> {
        self.inner
            .profile(query)
            .category_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Human-readable per-category counts for a catalog
    pub fn summarize(&self, tools: Vec<Py<Tool>>) -> String {
        self.inner.summarize_catalog(&views(&tools)).to_string()
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "RelevanceFilter(categories={}, max_results={})",
            config.categories.len(),
            config.max_results
        )
    }
}

// ============================================================================
// Module Functions
// ============================================================================

/// Filter with the built-in tables
#[pyfunction]
#[pyo3(signature = (query, tools, max_tools=DEFAULT_MAX_RESULTS))]
pub fn filter_relevant_tools(
    py: Python<'_>,
    query: &str,
    tools: Vec<Py<Tool>>,
    max_tools: usize,
) -> PyResult<Vec<Py<Tool>>> {
    let filter = CoreRelevanceFilter::builtin().map_err(config_err)?;
    select(py, &filter, query, &tools, max_tools)
}

/// OpenAI-style function declarations as a JSON string
#[pyfunction]
pub fn to_openai_tools(tools: Vec<Tool>) -> PyResult<String> {
    let core: Vec<CoreTool> = tools.iter().map(Tool::to_core).collect::<PyResult<_>>()?;
    let declarations = to_function_declarations(&core, MODEL_FUNCTION_LIMIT).map_err(function_err)?;
    serde_json::to_string(&declarations).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

// ============================================================================
// Module Definition
// ============================================================================

#[pymodule]
fn toolsift(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<Tool>()?;
    m.add_class::<RelevanceFilter>()?;

    // Functions
    m.add_function(wrap_pyfunction!(filter_relevant_tools, m)?)?;
    m.add_function(wrap_pyfunction!(to_openai_tools, m)?)?;

    // Limits
    m.add("MODEL_FUNCTION_LIMIT", MODEL_FUNCTION_LIMIT)?;
    m.add("DEFAULT_MAX_RESULTS", DEFAULT_MAX_RESULTS)?;
    m.add("MAX_DESCRIPTION_CHARS", MAX_DESCRIPTION_CHARS)?;

    Ok(())
}
