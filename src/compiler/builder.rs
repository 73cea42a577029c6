use super::ids::IdAllocator;
use super::{CompileError, CompileOptions};
use crate::layout::LayoutEngine;
use crate::model::{
    EdgeStyle, Graph, GraphEdge, GraphNode, NodeKind, PathSegment, Position, Property, ROOT_LABEL,
    ValueKind, array_summary, child_path, classify, is_expandable, object_summary, summarize,
};
use serde_json::{Map, Value};

/// Label stem for items of an array that is itself the document root.
const ROOT_ITEM_LABEL: &str = "item";

/// What structurally contains an array being expanded.
///
/// Items of an array owned by the root or by an object attach straight to
/// that owner. An array sitting inside another array gets a box of its own,
/// otherwise the items of sibling arrays would be indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Root,
    Object,
    Array,
}

/// Where an array's items get attached and how they are labeled.
struct ArrayScope<'a> {
    parent_id: &'a str,
    /// Row key on the parent that the array's edges expand.
    via: &'a str,
    /// Label stem for the items, and the label of a materialized array box.
    key: &'a str,
    path: &'a [PathSegment],
    origin: Position,
    parent_kind: ParentKind,
}

/// Single-use builder that owns all mutable state of one compilation run.
pub struct GraphBuilder {
    layout: LayoutEngine,
    edge_style: EdgeStyle,
    max_depth: usize,
    max_nodes: usize,
    ids: IdAllocator,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    placed: Vec<Position>,
}

impl GraphBuilder {
    pub fn new(options: &CompileOptions) -> Self {
        Self {
            layout: LayoutEngine::new(options.layout.clone()),
            edge_style: options.edge_style,
            max_depth: options.max_depth,
            max_nodes: options.max_nodes,
            ids: IdAllocator::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            placed: Vec::new(),
        }
    }

    pub fn build(mut self, value: &Value) -> Result<Graph, CompileError> {
        let origin = Position::default();

        match value {
            Value::Object(map) => {
                let root = self.add_node(NodeKind::Root, ROOT_LABEL, object_rows(map), origin, Vec::new())?;
                self.expand_object(map, &root, origin, &[])?;
            }
            Value::Array(items) => {
                let rows = vec![Property::synthetic(array_summary(items.len()), ValueKind::Array)];
                let root = self.add_node(NodeKind::Root, ROOT_LABEL, rows, origin, Vec::new())?;
                if !items.is_empty() {
                    let scope = ArrayScope {
                        parent_id: &root,
                        via: "",
                        key: ROOT_ITEM_LABEL,
                        path: &[],
                        origin: self.layout.calculate_child_position(origin, 0, 1),
                        parent_kind: ParentKind::Root,
                    };
                    self.expand_array(items, &scope)?;
                }
            }
            scalar => {
                let rows = vec![Property::synthetic(summarize(scalar), classify(scalar))];
                self.add_node(NodeKind::Primitive, ROOT_LABEL, rows, origin, Vec::new())?;
            }
        }

        Ok(self.finish())
    }

    /// Add an existing node to attach arrays to. Mostly useful for driving
    /// [`GraphBuilder::process_array`] directly.
    pub fn add_anchor(&mut self, label: &str, position: Position) -> Result<String, CompileError> {
        self.add_node(NodeKind::Object, label, Vec::new(), position, Vec::new())
    }

    /// Expand `value` as the array stored under `key` on `parent_id`.
    ///
    /// Anything that is not an array, or a parent that does not exist, adds
    /// nothing.
    pub fn process_array(
        &mut self,
        value: &Value,
        parent_id: &str,
        key: &str,
        origin: Position,
        parent_kind: ParentKind,
    ) -> Result<(), CompileError> {
        let Value::Array(items) = value else {
            return Ok(());
        };
        let Some(parent) = self.nodes.iter().find(|n| n.id == parent_id) else {
            return Ok(());
        };
        let path = child_path(&parent.path, key);
        let parent_id = parent.id.clone();

        let scope = ArrayScope {
            parent_id: &parent_id,
            via: key,
            key,
            path: &path,
            origin,
            parent_kind,
        };
        self.expand_array(items, &scope)
    }

    pub fn finish(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    /// Create child boxes for every non-empty container field of an object.
    /// Scalars and empty containers are already fully shown as rows.
    fn expand_object(
        &mut self,
        map: &Map<String, Value>,
        node_id: &str,
        position: Position,
        path: &[PathSegment],
    ) -> Result<(), CompileError> {
        let containers: Vec<(&String, &Value)> = map.iter().filter(|(_, v)| is_expandable(v)).collect();
        let count = containers.len();

        for (index, (key, value)) in containers.into_iter().enumerate() {
            let candidate = self.layout.calculate_child_position(position, index, count);
            let field_path = child_path(path, key.as_str());

            match value {
                Value::Object(inner) => {
                    let child = self.add_placed_node(NodeKind::Object, key, object_rows(inner), candidate, field_path.clone())?;
                    self.connect(node_id, &child, key);
                    let child_position = self.position_of_last();
                    self.expand_object(inner, &child, child_position, &field_path)?;
                }
                Value::Array(items) => {
                    let scope = ArrayScope {
                        parent_id: node_id,
                        via: key,
                        key,
                        path: &field_path,
                        origin: candidate,
                        parent_kind: ParentKind::Object,
                    };
                    self.expand_array(items, &scope)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn expand_array(&mut self, items: &[Value], scope: &ArrayScope<'_>) -> Result<(), CompileError> {
        if items.is_empty() {
            let rows = vec![Property::synthetic(array_summary(0), ValueKind::Array)];
            let node = self.add_placed_node(NodeKind::Array, scope.key, rows, scope.origin, scope.path.to_vec())?;
            self.connect(scope.parent_id, &node, scope.via);
            return Ok(());
        }

        let (anchor, via, origin) = if scope.parent_kind == ParentKind::Array {
            let rows = vec![Property::synthetic(array_summary(items.len()), ValueKind::Array)];
            let node = self.add_placed_node(NodeKind::Array, scope.key, rows, scope.origin, scope.path.to_vec())?;
            self.connect(scope.parent_id, &node, scope.via);
            let placed = self.position_of_last();
            (node, "", Position::new(self.layout.child_column(placed.x), placed.y))
        } else {
            (scope.parent_id.to_string(), scope.via, scope.origin)
        };

        let half = items.len() as f64 / 2.0;
        let pitch = self.layout.row_pitch();

        for (index, item) in items.iter().enumerate() {
            let candidate = Position::new(origin.x, origin.y + (index as f64 - half) * pitch);
            let label = format!("{} {}", scope.key, index);
            let item_path = child_path(scope.path, index);

            match item {
                Value::Object(map) => {
                    let child = self.add_placed_node(NodeKind::Object, &label, object_rows(map), candidate, item_path.clone())?;
                    self.connect(&anchor, &child, via);
                    let child_position = self.position_of_last();
                    self.expand_object(map, &child, child_position, &item_path)?;
                }
                Value::Array(inner) => {
                    let nested = ArrayScope {
                        parent_id: &anchor,
                        via,
                        key: &label,
                        path: &item_path,
                        origin: candidate,
                        parent_kind: ParentKind::Array,
                    };
                    self.expand_array(inner, &nested)?;
                }
                scalar => {
                    let rows = vec![Property::synthetic(summarize(scalar), classify(scalar))];
                    let child = self.add_placed_node(NodeKind::Primitive, &label, rows, candidate, item_path)?;
                    self.connect(&anchor, &child, via);
                }
            }
        }

        Ok(())
    }

    fn add_placed_node(
        &mut self,
        kind: NodeKind,
        label: &str,
        properties: Vec<Property>,
        candidate: Position,
        path: Vec<PathSegment>,
    ) -> Result<String, CompileError> {
        let position = self.layout.find_non_overlapping_position(candidate, &self.placed);
        self.add_node(kind, label, properties, position, path)
    }

    fn add_node(
        &mut self,
        kind: NodeKind,
        label: &str,
        properties: Vec<Property>,
        position: Position,
        path: Vec<PathSegment>,
    ) -> Result<String, CompileError> {
        if path.len() > self.max_depth {
            return Err(CompileError::DepthLimit { max: self.max_depth });
        }
        if self.nodes.len() >= self.max_nodes {
            return Err(CompileError::NodeLimit { max: self.max_nodes });
        }

        let id = self.ids.node_id();
        self.placed.push(position);
        self.nodes.push(GraphNode {
            id: id.clone(),
            kind,
            label: label.to_string(),
            properties,
            position,
            hidden: false,
            path,
        });
        Ok(id)
    }

    fn connect(&mut self, source: &str, target: &str, via: &str) {
        let id = self.ids.edge_id(source, target);
        self.edges.push(GraphEdge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            hidden: false,
            style: self.edge_style,
            source_property: Some(via.to_string()),
        });
    }

    fn position_of_last(&self) -> Position {
        self.placed.last().copied().unwrap_or_default()
    }
}

/// One row per key in insertion order; empty objects get a placeholder row.
fn object_rows(map: &Map<String, Value>) -> Vec<Property> {
    if map.is_empty() {
        return vec![Property::synthetic(object_summary(0), ValueKind::Object)];
    }
    map.iter()
        .map(|(key, value)| Property::new(key.as_str(), summarize(value), classify(value)))
        .collect()
}
