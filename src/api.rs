//! Library API for jsonviz.
//!
//! The CLI commands print output and return exit codes. These functions do
//! the same work but hand back `Result`s for calling code.
//!
//! # Example
//!
//! ```no_run
//! use jsonviz::{Config, compile_str};
//!
//! let graph = compile_str(r#"{"name": "Acme", "tags": ["a", "b"]}"#, &Config::default())?;
//! println!("{} nodes, {} edges", graph.node_count(), graph.edge_count());
//! # Ok::<(), jsonviz::JsonVizError>(())
//! ```

use crate::compiler::{self, CompileError, CompileOptions};
use crate::config::{Config, ConfigError};
use crate::interaction::{AncestorTrace, GraphIndex, find_ancestors};
use crate::model::{Graph, GraphNode};
use crate::policy::{self, InputLimits, PolicyError};
use crate::resolver::{self, ResolveError, Resolved};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during jsonviz operations.
#[derive(Debug, Error)]
pub enum JsonVizError {
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input was rejected before or after compilation.
    #[error("{0}")]
    Policy(#[from] PolicyError),

    /// The compiler hit one of its hard ceilings.
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("No node with id '{0}'")]
    UnknownNode(String),

    /// The background compile task died.
    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ancestors of one node in a compiled graph.
#[derive(Debug, Clone, Serialize)]
pub struct TraceResult {
    pub node: GraphNode,
    pub trace: AncestorTrace,
}

impl TraceResult {
    /// Labels along the root to node path.
    pub fn path_labels(&self, graph: &Graph) -> Vec<String> {
        self.trace
            .path_nodes
            .iter()
            .filter_map(|id| graph.node(id))
            .map(|n| n.label.clone())
            .collect()
    }
}

/// Admit `text` under `limits`, compile it and check the node count.
///
/// This is the whole pipeline the worker and the CLI run.
pub fn compile_source(
    text: &str,
    options: &CompileOptions,
    limits: &InputLimits,
) -> Result<Graph, JsonVizError> {
    let value = policy::admit(text, limits)?;
    let graph = compiler::compile(&value, options)?;
    policy::check_node_count(graph.node_count(), limits)?;
    Ok(graph)
}

/// Compile JSON text with the settings and tier limits from `config`.
///
/// # Example
///
/// ```no_run
/// use jsonviz::{Config, compile_str};
///
/// let graph = compile_str("[1, 2, 3]", &Config::default())?;
/// assert_eq!(graph.node_count(), 4);
/// # Ok::<(), jsonviz::JsonVizError>(())
/// ```
pub fn compile_str(text: &str, config: &Config) -> Result<Graph, JsonVizError> {
    compile_source(text, &config.compile_options(), &config.active_limits())
}

/// Resolve a displayed node label against JSON text.
pub fn inspect(text: &str, label: &str) -> Result<Resolved, JsonVizError> {
    Ok(resolver::resolve_text(text, label)?)
}

/// Compile `text` and trace the ancestors of `node_id`.
pub fn trace(text: &str, node_id: &str, config: &Config) -> Result<(Graph, TraceResult), JsonVizError> {
    let graph = compile_str(text, config)?;
    let index = GraphIndex::build(&graph);
    let trace = find_ancestors(&graph, &index, node_id)
        .ok_or_else(|| JsonVizError::UnknownNode(node_id.to_string()))?;
    let node = graph
        .node(node_id)
        .cloned()
        .ok_or_else(|| JsonVizError::UnknownNode(node_id.to_string()))?;

    Ok((graph, TraceResult { node, trace }))
}
