//! Hover tracing and collapse on an already compiled graph.
//!
//! Nothing here adds or removes nodes. Operations only flip `hidden` flags or
//! compute id sets that the renderer turns into visual state.

mod collapse;
mod index;
mod trace;

pub use collapse::{CollapseChange, CollapseState, Descendants, find_descendants, property_edges};
pub use index::{GraphIndex, GraphStats};
pub use trace::{AncestorTrace, Highlight, find_ancestors};

use crate::model::Graph;
use tracing::debug;

/// A compiled graph plus all interaction state layered on top of it.
pub struct GraphSession {
    graph: Graph,
    index: GraphIndex,
    collapse: CollapseState,
    highlight: Option<Highlight>,
    dragging: bool,
}

impl GraphSession {
    pub fn new(graph: Graph) -> Self {
        let index = GraphIndex::build(&graph);
        Self {
            graph,
            index,
            collapse: CollapseState::new(),
            highlight: None,
            dragging: false,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    pub fn find_ancestors(&self, node_id: &str) -> Option<AncestorTrace> {
        find_ancestors(&self.graph, &self.index, node_id)
    }

    pub fn find_descendants(&self, node_id: &str) -> Descendants {
        find_descendants(&self.graph, &self.index, node_id)
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Compute the highlight for a hovered node.
    ///
    /// Ignored while a drag is in progress or for unknown nodes; the current
    /// highlight is left as it was in both cases.
    pub fn hover_enter(&mut self, node_id: &str) -> Option<&Highlight> {
        if self.dragging {
            debug!(node_id, "hover ignored while dragging");
            return None;
        }
        let trace = self.find_ancestors(node_id)?;
        self.highlight = Some(Highlight::from_trace(&self.graph, node_id, &trace));
        self.highlight.as_ref()
    }

    pub fn hover_leave(&mut self) {
        self.highlight = None;
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn toggle_node_collapse(&mut self, node_id: &str) -> Option<CollapseChange> {
        self.collapse.toggle_node(&mut self.graph, &self.index, node_id)
    }

    pub fn toggle_property_collapse(&mut self, node_id: &str, property_key: &str) -> Option<CollapseChange> {
        let change = self
            .collapse
            .toggle_property(&mut self.graph, &self.index, node_id, property_key);
        if change.is_none() {
            debug!(node_id, property_key, "property has no child nodes to collapse");
        }
        change
    }

    pub fn is_collapsed(&self, node_id: &str) -> bool {
        self.collapse.is_collapsed(node_id)
    }

    pub fn is_property_collapsed(&self, node_id: &str, property_key: &str) -> bool {
        self.collapse.is_property_collapsed(node_id, property_key)
    }
}
