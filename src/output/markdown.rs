use crate::interaction::GraphIndex;
use crate::model::{Graph, GraphNode};
use crate::output::OutputFormatter;
use std::collections::HashSet;
use std::io::Write;

/// Summary table plus an indented outline of the diagram.
pub struct MarkdownOutput {
    pub title: String,
    /// Print property rows under each node in the outline.
    pub show_properties: bool,
}

impl MarkdownOutput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            show_properties: true,
        }
    }

    pub fn without_properties(mut self) -> Self {
        self.show_properties = false;
        self
    }

    fn write_node<W: Write>(
        &self,
        graph: &Graph,
        index: &GraphIndex,
        node: &GraphNode,
        depth: usize,
        visited: &mut HashSet<String>,
        writer: &mut W,
    ) -> std::io::Result<()> {
        if !visited.insert(node.id.clone()) {
            return Ok(());
        }

        let indent = "  ".repeat(depth);
        let hidden = if node.hidden { " _(collapsed)_" } else { "" };
        writeln!(writer, "{}- **{}** `{}`{}", indent, node.label, node.id, hidden)?;

        if self.show_properties {
            for property in &node.properties {
                if property.key.is_empty() {
                    writeln!(writer, "{}  - {}", indent, property.value)?;
                } else {
                    writeln!(writer, "{}  - `{}`: {}", indent, property.key, property.value)?;
                }
            }
        }

        for pos in index.outgoing(&node.id) {
            let edge = &graph.edges[pos];
            if let Some(child) = graph.node(&edge.target) {
                self.write_node(graph, index, child, depth + 1, visited, writer)?;
            }
        }
        Ok(())
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new("JSON Diagram")
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, graph: &Graph, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# {}\n", self.title)?;

        let stats = graph.stats();
        writeln!(writer, "## Summary\n")?;
        writeln!(writer, "| Metric | Value |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Nodes | {} |", stats.nodes)?;
        writeln!(writer, "| Edges | {} |", stats.edges)?;
        writeln!(writer, "| Visible nodes | {} |", graph.visible_node_count())?;
        writeln!(writer, "| Hidden nodes | {} |", stats.hidden_nodes)?;
        writeln!(writer, "| Max depth | {} |", stats.max_depth)?;
        for (kind, count) in &stats.by_kind {
            writeln!(writer, "| {} nodes | {} |", kind, count)?;
        }

        let Some(root) = graph.root() else {
            writeln!(writer, "\n_Empty diagram._")?;
            return Ok(());
        };

        writeln!(writer, "\n## Outline\n")?;
        let index = GraphIndex::build(graph);
        let mut visited = HashSet::new();
        self.write_node(graph, &index, root, 0, &mut visited, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, compile};
    use crate::output::render_to_string;
    use serde_json::json;

    #[test]
    fn test_outline_nests_children_under_parents() {
        let graph = compile(
            &json!({"name": "Acme", "office": {"city": "Oslo"}}),
            &CompileOptions::default(),
        )
        .unwrap();
        let text = render_to_string(&MarkdownOutput::new("acme.json"), &graph).unwrap();

        assert!(text.starts_with("# acme.json\n"));
        assert!(text.contains("| Nodes | 2 |"));
        assert!(text.contains("- **Root** `node-0`\n  - `name`: \"Acme\"\n  - `office`: {1 key}\n"));
        assert!(text.contains("  - **office** `node-1`\n    - `city`: \"Oslo\"\n"));
    }

    #[test]
    fn test_synthetic_rows_and_collapsed_marker() {
        let mut graph = compile(&json!([1]), &CompileOptions::default()).unwrap();
        graph.nodes[1].hidden = true;

        let text = render_to_string(&MarkdownOutput::default(), &graph).unwrap();
        assert!(text.contains("| Visible nodes | 1 |"));
        assert!(text.contains("| Hidden nodes | 1 |"));
        assert!(text.contains("  - **item 0** `node-1` _(collapsed)_\n    - 1\n"));
    }

    #[test]
    fn test_without_properties() {
        let graph = compile(&json!({"a": {"b": 1}}), &CompileOptions::default()).unwrap();
        let text = render_to_string(&MarkdownOutput::default().without_properties(), &graph).unwrap();
        assert!(!text.contains("`b`"));
        assert!(text.contains("  - **a** `node-1`"));
    }

    #[test]
    fn test_empty_graph() {
        let text = render_to_string(&MarkdownOutput::default(), &Graph::default()).unwrap();
        assert!(text.contains("_Empty diagram._"));
    }
}
