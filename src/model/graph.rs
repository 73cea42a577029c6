use super::path::{PathSegment, breadcrumb};
use super::value::ValueKind;
use serde::{Deserialize, Serialize};

/// Top-left corner of a node box in diagram units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One key/value line inside a node box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: Some(kind),
        }
    }

    /// Row with an empty key, used by array placeholders and primitive items.
    pub fn synthetic(value: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(String::new(), value, kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Object,
    Array,
    Primitive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub properties: Vec<Property>,
    pub position: Position,
    #[serde(default)]
    pub hidden: bool,
    /// Location of the displayed value inside the source document.
    pub path: Vec<PathSegment>,
}

impl GraphNode {
    pub fn breadcrumb(&self) -> String {
        breadcrumb(&self.path)
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }
}

/// Rendering hint carried by every edge. The compiler copies it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Default,
    SmoothStep,
    Step,
    Straight,
}

impl std::fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeStyle::Default => write!(f, "default"),
            EdgeStyle::SmoothStep => write!(f, "smoothstep"),
            EdgeStyle::Step => write!(f, "step"),
            EdgeStyle::Straight => write!(f, "straight"),
        }
    }
}

impl std::str::FromStr for EdgeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "bezier" => Ok(EdgeStyle::Default),
            "smoothstep" | "smooth-step" => Ok(EdgeStyle::SmoothStep),
            "step" => Ok(EdgeStyle::Step),
            "straight" => Ok(EdgeStyle::Straight),
            _ => Err(format!(
                "Invalid edge style '{}'. Valid options: default, smoothstep, step, straight",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(rename = "type")]
    pub style: EdgeStyle,
    /// Key of the row on `source` that this edge expands.
    pub source_property: Option<String>,
}

/// A compiled diagram: a forest of boxes rooted at `nodes[0]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn visible_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.hidden).count()
    }

    /// Edges leaving `node_id`, in creation order.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }
}
