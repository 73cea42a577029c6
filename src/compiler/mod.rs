//! JSON to diagram compiler.
//!
//! Walks a parsed JSON value and produces a [`Graph`]: one box per object,
//! per array nested inside another array, and per array item, each with its
//! property rows filled in and a position assigned at creation time.

mod builder;
mod ids;

pub use builder::{GraphBuilder, ParentKind};
pub use ids::IdAllocator;

use crate::layout::LayoutConfig;
use crate::model::{EdgeStyle, Graph};
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Hard ceilings that stop compilation of adversarial input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("JSON nesting exceeds the maximum depth of {max}")]
    DepthLimit { max: usize },
    #[error("Graph would exceed the maximum of {max} nodes")]
    NodeLimit { max: usize },
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub layout: LayoutConfig,
    pub edge_style: EdgeStyle,
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            edge_style: EdgeStyle::Default,
            max_depth: 100,
            max_nodes: 10_000,
        }
    }
}

/// Compile `value` into a fresh graph. Ids start at `node-0` on every call.
pub fn compile(value: &Value, options: &CompileOptions) -> Result<Graph, CompileError> {
    let started = Instant::now();
    let result = GraphBuilder::new(options).build(value);

    match &result {
        Ok(graph) => debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "compiled graph"
        ),
        Err(e) => warn!(error = %e, "compilation aborted"),
    }

    result
}
