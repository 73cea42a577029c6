mod graph;
mod path;
mod value;

pub use graph::{EdgeStyle, Graph, GraphEdge, GraphNode, NodeKind, Position, Property};
pub use path::{PATH_SEPARATOR, PathSegment, ROOT_LABEL, breadcrumb, child_path};
pub use value::{
    ValueKind, array_summary, classify, is_expandable, object_summary, summarize,
};
