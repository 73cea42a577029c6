use crate::model::{Graph, GraphEdge, GraphNode};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// The `{nodes, edges}` document a renderer consumes.
pub struct JsonOutput {
    pub pretty: bool,
    /// Leave out collapsed nodes and edges.
    pub visible_only: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self {
            pretty: true,
            visible_only: false,
        }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn visible_only(mut self) -> Self {
        self.visible_only = true;
        self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<&'a GraphNode>,
    edges: Vec<&'a GraphEdge>,
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, graph: &Graph, writer: &mut W) -> std::io::Result<()> {
        let document = JsonGraph {
            nodes: graph
                .nodes
                .iter()
                .filter(|n| !self.visible_only || !n.hidden)
                .collect(),
            edges: graph
                .edges
                .iter()
                .filter(|e| !self.visible_only || !e.hidden)
                .collect(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        }
        .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, compile};
    use crate::output::render_to_string;
    use serde_json::{Value, json};

    #[test]
    fn test_document_shape_uses_renderer_field_names() {
        let graph = compile(&json!({"tags": ["a"]}), &CompileOptions::default()).unwrap();
        let text = render_to_string(&JsonOutput::new(), &graph).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();

        let node = &doc["nodes"][1];
        assert_eq!(node["id"], "node-1");
        assert_eq!(node["label"], "tags 0");
        assert_eq!(node["properties"][0]["type"], "string");
        assert_eq!(node["position"]["x"], json!(440.0));

        let edge = &doc["edges"][0];
        assert_eq!(edge["type"], "default");
        assert_eq!(edge["sourceProperty"], "tags");
    }

    #[test]
    fn test_visible_only_drops_hidden() {
        let mut graph = compile(&json!({"a": {"b": 1}}), &CompileOptions::default()).unwrap();
        graph.nodes[1].hidden = true;
        graph.edges[0].hidden = true;

        let text = render_to_string(&JsonOutput::new().compact().visible_only(), &graph).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 1);
        assert!(doc["edges"].as_array().unwrap().is_empty());
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_document_parses_back_into_graph() {
        let graph = compile(&json!([{"id": 1}, [true]]), &CompileOptions::default()).unwrap();
        let text = render_to_string(&JsonOutput::new(), &graph).unwrap();
        let parsed: Graph = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, graph);
    }
}
