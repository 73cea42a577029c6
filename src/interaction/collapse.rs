use super::index::GraphIndex;
use crate::model::{Graph, GraphEdge};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Every node and edge below a starting point, not just direct children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Descendants {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
    /// Edge positions in breadth-first order.
    #[serde(skip)]
    edge_positions: Vec<usize>,
}

impl Descendants {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

pub fn find_descendants(graph: &Graph, index: &GraphIndex, node_id: &str) -> Descendants {
    if !index.contains(node_id) {
        return Descendants::default();
    }
    collect_below(graph, index, index.outgoing(node_id), HashSet::from([node_id.to_string()]))
}

/// Breadth-first walk starting from `start_edges`. `visited` guards against
/// revisiting a node even if the graph was tampered with.
fn collect_below(
    graph: &Graph,
    index: &GraphIndex,
    start_edges: Vec<usize>,
    mut visited: HashSet<String>,
) -> Descendants {
    let mut found = Descendants::default();
    let mut queue: VecDeque<usize> = start_edges.into_iter().collect();

    while let Some(pos) = queue.pop_front() {
        let edge = &graph.edges[pos];
        found.edges.push(edge.id.clone());
        found.edge_positions.push(pos);

        if !visited.insert(edge.target.clone()) {
            continue;
        }
        if index.contains(&edge.target) {
            found.nodes.push(edge.target.clone());
        }
        queue.extend(index.outgoing(&edge.target));
    }

    found
}

/// Edges on `node_id` that expand the row `property_key`.
///
/// Edges carrying a `source_property` are matched exactly. Edges without one
/// fall back to matching the child label: either the key itself or the key
/// followed by an item index.
pub fn property_edges(graph: &Graph, index: &GraphIndex, node_id: &str, property_key: &str) -> Vec<usize> {
    index
        .outgoing(node_id)
        .into_iter()
        .filter(|pos| {
            let edge = &graph.edges[*pos];
            match &edge.source_property {
                Some(key) => key == property_key,
                None => label_matches(graph, index, edge, property_key),
            }
        })
        .collect()
}

fn label_matches(graph: &Graph, index: &GraphIndex, edge: &GraphEdge, property_key: &str) -> bool {
    let Some(node) = index.node_position(&edge.target).map(|pos| &graph.nodes[pos]) else {
        return false;
    };
    if node.label == property_key {
        return true;
    }
    node.label
        .strip_prefix(property_key)
        .and_then(|rest| rest.strip_prefix(' '))
        .is_some_and(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
}

/// What a toggle changed, for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapseChange {
    pub collapsed: bool,
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

/// Collapse bookkeeping for one graph.
///
/// Only the set of collapsed nodes and collapsed rows is stored. Every toggle
/// recomputes the `hidden` flags of the subtree it touches from that set, so
/// an edge is hidden exactly when its source is hidden, its source is
/// collapsed, or it hangs off a collapsed row.
#[derive(Debug, Default)]
pub struct CollapseState {
    nodes: HashSet<String>,
    properties: HashSet<(String, String)>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, node_id: &str) -> bool {
        self.nodes.contains(node_id)
    }

    pub fn is_property_collapsed(&self, node_id: &str, property_key: &str) -> bool {
        self.properties
            .contains(&(node_id.to_string(), property_key.to_string()))
    }

    /// Hide or show everything below `node_id`. `None` for an unknown node.
    pub fn toggle_node(&mut self, graph: &mut Graph, index: &GraphIndex, node_id: &str) -> Option<CollapseChange> {
        if !index.contains(node_id) {
            return None;
        }
        let collapsed = if self.nodes.remove(node_id) {
            false
        } else {
            self.nodes.insert(node_id.to_string());
            true
        };

        let found = find_descendants(graph, index, node_id);
        self.refresh(graph, index, &found);
        Some(CollapseChange {
            collapsed,
            nodes: found.nodes,
            edges: found.edges,
        })
    }

    /// Hide or show only the subtree hanging off one row of `node_id`.
    /// `None` when the row has no child boxes.
    pub fn toggle_property(
        &mut self,
        graph: &mut Graph,
        index: &GraphIndex,
        node_id: &str,
        property_key: &str,
    ) -> Option<CollapseChange> {
        let edges = property_edges(graph, index, node_id, property_key);
        if edges.is_empty() {
            return None;
        }
        let key = (node_id.to_string(), property_key.to_string());
        let collapsed = if self.properties.remove(&key) {
            false
        } else {
            self.properties.insert(key);
            true
        };

        let found = collect_below(graph, index, edges, HashSet::from([node_id.to_string()]));
        self.refresh(graph, index, &found);
        Some(CollapseChange {
            collapsed,
            nodes: found.nodes,
            edges: found.edges,
        })
    }

    /// Recompute `hidden` for the edges in `found` and their targets.
    ///
    /// Edges are visited breadth first, so a source below the starting point
    /// is always updated before its outgoing edges.
    fn refresh(&self, graph: &mut Graph, index: &GraphIndex, found: &Descendants) {
        let blocked: HashSet<usize> = self
            .properties
            .iter()
            .flat_map(|(node, key)| property_edges(graph, index, node, key))
            .collect();

        for &pos in &found.edge_positions {
            let source = &graph.edges[pos].source;
            let source_hidden = index
                .node_position(source)
                .is_some_and(|p| graph.nodes[p].hidden);
            let hidden = source_hidden || self.nodes.contains(source) || blocked.contains(&pos);

            graph.edges[pos].hidden = hidden;
            if let Some(target) = index.node_position(&graph.edges[pos].target) {
                graph.nodes[target].hidden = hidden;
            }
        }
    }
}
