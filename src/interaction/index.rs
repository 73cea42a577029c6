use crate::model::{Graph, NodeKind};
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Adjacency over a compiled [`Graph`], keyed by node id.
///
/// Node weights are positions in `Graph::nodes` and edge weights positions in
/// `Graph::edges`. The compiled graph never gains or loses nodes after
/// compilation, so one index stays valid for the life of the graph.
pub struct GraphIndex {
    graph: DiGraph<usize, usize>,
    node_indices: HashMap<String, NodeIndex>,
}

impl GraphIndex {
    pub fn build(source: &Graph) -> Self {
        let mut graph = DiGraph::with_capacity(source.nodes.len(), source.edges.len());
        let mut node_indices = HashMap::with_capacity(source.nodes.len());

        for (pos, node) in source.nodes.iter().enumerate() {
            let idx = graph.add_node(pos);
            node_indices.insert(node.id.clone(), idx);
        }

        for (pos, edge) in source.edges.iter().enumerate() {
            // Dangling edges are ignored rather than rejected
            if let (Some(from), Some(to)) = (node_indices.get(&edge.source), node_indices.get(&edge.target)) {
                graph.add_edge(*from, *to, pos);
            }
        }

        Self {
            graph,
            node_indices,
        }
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.node_indices.contains_key(node_id)
    }

    /// Position of `node_id` in `Graph::nodes`.
    pub fn node_position(&self, node_id: &str) -> Option<usize> {
        self.node_indices.get(node_id).map(|idx| self.graph[*idx])
    }

    /// Positions (in `Graph::edges`) of edges pointing at `node_id`, in creation order.
    pub fn incoming(&self, node_id: &str) -> Vec<usize> {
        self.edges_directed(node_id, Direction::Incoming)
    }

    /// Positions of edges leaving `node_id`, in creation order.
    pub fn outgoing(&self, node_id: &str) -> Vec<usize> {
        self.edges_directed(node_id, Direction::Outgoing)
    }

    fn edges_directed(&self, node_id: &str, direction: Direction) -> Vec<usize> {
        let Some(idx) = self.node_indices.get(node_id) else {
            return Vec::new();
        };
        let mut positions: Vec<usize> = self
            .graph
            .edges_directed(*idx, direction)
            .map(|e| *e.weight())
            .collect();
        positions.sort_unstable();
        positions
    }

    pub fn fan_out(&self, node_id: &str) -> usize {
        self.node_indices
            .get(node_id)
            .map(|idx| self.graph.neighbors_directed(*idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    /// No cycles and no node with more than one parent.
    pub fn is_forest(&self) -> bool {
        let single_parent = self.graph.node_indices().all(|idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .count()
                <= 1
        });
        single_parent && !is_cyclic_directed(&self.graph)
    }

    /// Longest root-to-leaf edge count, walking from every parentless node.
    pub fn max_depth(&self) -> usize {
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| {
                self.graph
                    .neighbors_directed(*idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        for idx in &queue {
            depth.insert(*idx, 0);
        }

        while let Some(idx) = queue.pop_front() {
            let d = depth[&idx];
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if !depth.contains_key(&next) {
                    depth.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }

        depth.values().copied().max().unwrap_or(0)
    }
}

/// Summary numbers for status bars and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub hidden_nodes: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub max_depth: usize,
    pub is_forest: bool,
}

impl Graph {
    pub fn stats(&self) -> GraphStats {
        let index = GraphIndex::build(self);

        let mut by_kind = BTreeMap::new();
        for node in &self.nodes {
            let kind = match node.kind {
                NodeKind::Root => "root",
                NodeKind::Object => "object",
                NodeKind::Array => "array",
                NodeKind::Primitive => "primitive",
            };
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }

        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            hidden_nodes: self.nodes.iter().filter(|n| n.hidden).count(),
            by_kind,
            max_depth: index.max_depth(),
            is_forest: index.is_forest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, compile};
    use crate::model::{EdgeStyle, GraphEdge};
    use serde_json::json;

    #[test]
    fn test_index_lookups() {
        let graph = compile(&json!({"a": [1, 2], "b": {"c": 3}}), &CompileOptions::default()).unwrap();
        let index = GraphIndex::build(&graph);

        assert!(index.contains("node-0"));
        assert!(!index.contains("node-99"));
        assert_eq!(index.fan_out("node-0"), 3);
        assert_eq!(index.outgoing("node-0"), vec![0, 1, 2]);
        assert_eq!(index.incoming("node-3"), vec![2]);
        assert_eq!(index.node_position("node-2"), Some(2));
    }

    #[test]
    fn test_compiled_graph_is_forest() {
        let graph = compile(
            &json!({"x": [[1, [2, 3]], {"y": {"z": [true]}}]}),
            &CompileOptions::default(),
        )
        .unwrap();
        let stats = graph.stats();

        assert!(stats.is_forest);
        assert_eq!(stats.nodes, graph.nodes.len());
        assert_eq!(stats.by_kind["root"], 1);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_second_parent_breaks_forest() {
        let mut graph = compile(&json!({"a": {"k": 1}, "b": {"k": 2}}), &CompileOptions::default()).unwrap();
        graph.edges.push(GraphEdge {
            id: "extra".to_string(),
            source: "node-1".to_string(),
            target: "node-2".to_string(),
            hidden: false,
            style: EdgeStyle::Default,
            source_property: None,
        });

        assert!(!graph.stats().is_forest);
    }
}
