use super::index::GraphIndex;
use crate::model::Graph;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Everything above a node, plus the single chain that links it to the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AncestorTrace {
    /// Ancestor node ids in discovery order, excluding the traced node.
    pub nodes: Vec<String>,
    /// Every edge crossed while walking upward.
    pub edges: Vec<String>,
    /// Node ids from the root down to and including the traced node.
    pub path_nodes: Vec<String>,
    /// Edge ids along `path_nodes`.
    pub path_edges: Vec<String>,
}

/// Walk edges backward from `node_id` until no new source turns up.
///
/// Returns `None` for an unknown node.
pub fn find_ancestors(graph: &Graph, index: &GraphIndex, node_id: &str) -> Option<AncestorTrace> {
    if !index.contains(node_id) {
        return None;
    }

    let mut trace = AncestorTrace::default();
    let mut visited: HashSet<String> = HashSet::from([node_id.to_string()]);
    let mut seen_edges: HashSet<usize> = HashSet::new();
    // For each visited node, the first edge that reached it from above.
    let mut reached_by: HashMap<String, usize> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::from([node_id.to_string()]);

    while let Some(current) = queue.pop_front() {
        for pos in index.incoming(&current) {
            let edge = &graph.edges[pos];
            if seen_edges.insert(pos) {
                trace.edges.push(edge.id.clone());
            }
            reached_by.entry(current.clone()).or_insert(pos);
            if visited.insert(edge.source.clone()) {
                trace.nodes.push(edge.source.clone());
                queue.push_back(edge.source.clone());
            }
        }
    }

    let mut cursor = node_id.to_string();
    trace.path_nodes.push(cursor.clone());
    // Bounded by the number of visited nodes so a malformed graph cannot spin
    for _ in 0..visited.len() {
        let Some(pos) = reached_by.get(&cursor) else {
            break;
        };
        let edge = &graph.edges[*pos];
        trace.path_edges.push(edge.id.clone());
        trace.path_nodes.push(edge.source.clone());
        cursor = edge.source.clone();
    }
    trace.path_nodes.reverse();
    trace.path_edges.reverse();

    Some(trace)
}

/// Render state for a hovered node, expressed purely as id sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlight {
    pub hovered: String,
    pub highlighted_nodes: BTreeSet<String>,
    pub highlighted_edges: BTreeSet<String>,
    /// Edges on the root-to-hovered path.
    pub animated_edges: BTreeSet<String>,
    pub dimmed_nodes: BTreeSet<String>,
    pub dimmed_edges: BTreeSet<String>,
}

impl Highlight {
    pub fn from_trace(graph: &Graph, hovered: &str, trace: &AncestorTrace) -> Self {
        let mut highlighted_nodes: BTreeSet<String> = trace.nodes.iter().cloned().collect();
        highlighted_nodes.insert(hovered.to_string());
        let highlighted_edges: BTreeSet<String> = trace.edges.iter().cloned().collect();
        let animated_edges: BTreeSet<String> = trace.path_edges.iter().cloned().collect();

        let dimmed_nodes = graph
            .nodes
            .iter()
            .filter(|n| !highlighted_nodes.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();
        let dimmed_edges = graph
            .edges
            .iter()
            .filter(|e| !highlighted_edges.contains(&e.id))
            .map(|e| e.id.clone())
            .collect();

        Self {
            hovered: hovered.to_string(),
            highlighted_nodes,
            highlighted_edges,
            animated_edges,
            dimmed_nodes,
            dimmed_edges,
        }
    }

    pub fn is_highlighted(&self, node_id: &str) -> bool {
        self.highlighted_nodes.contains(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, compile};
    use serde_json::json;

    fn fixture() -> Graph {
        // node-0 Root, node-1 company, node-2 "staff 0", node-3 "skills 0", node-4 "skills 1", node-5 "staff 1"
        compile(
            &json!({"company": {"staff": [{"skills": ["rust", "go"]}, "vacant"]}}),
            &CompileOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_trace_reaches_root() {
        let graph = fixture();
        let index = GraphIndex::build(&graph);
        let leaf = graph.nodes.iter().find(|n| n.label == "skills 1").unwrap();

        let trace = find_ancestors(&graph, &index, &leaf.id).unwrap();

        assert_eq!(trace.nodes, vec!["node-2", "node-1", "node-0"]);
        assert_eq!(trace.edges.len(), 3);
        assert_eq!(trace.path_nodes, vec!["node-0", "node-1", "node-2", leaf.id.as_str()]);
        assert_eq!(trace.path_edges.len(), 3);
        assert_eq!(trace.path_edges[0], graph.edges[0].id);
    }

    #[test]
    fn test_root_has_no_ancestors() {
        let graph = fixture();
        let index = GraphIndex::build(&graph);

        let trace = find_ancestors(&graph, &index, "node-0").unwrap();

        assert!(trace.nodes.is_empty());
        assert_eq!(trace.path_nodes, vec!["node-0"]);
        assert!(trace.path_edges.is_empty());
    }

    #[test]
    fn test_unknown_node() {
        let graph = fixture();
        let index = GraphIndex::build(&graph);

        assert!(find_ancestors(&graph, &index, "node-404").is_none());
    }

    #[test]
    fn test_trace_is_idempotent() {
        let graph = fixture();
        let index = GraphIndex::build(&graph);

        let first = find_ancestors(&graph, &index, "node-4").unwrap();
        let second = find_ancestors(&graph, &index, "node-4").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_highlight_partitions_graph() {
        let graph = fixture();
        let index = GraphIndex::build(&graph);
        let trace = find_ancestors(&graph, &index, "node-3").unwrap();

        let highlight = Highlight::from_trace(&graph, "node-3", &trace);

        assert!(highlight.is_highlighted("node-3"));
        assert!(highlight.is_highlighted("node-0"));
        assert!(highlight.dimmed_nodes.contains("node-5"));
        assert_eq!(
            highlight.highlighted_nodes.len() + highlight.dimmed_nodes.len(),
            graph.nodes.len()
        );
        assert_eq!(
            highlight.highlighted_edges.len() + highlight.dimmed_edges.len(),
            graph.edges.len()
        );
        assert_eq!(highlight.animated_edges, highlight.highlighted_edges);
    }
}
