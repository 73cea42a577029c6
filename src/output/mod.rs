mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::Graph;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, graph: &Graph, writer: &mut W) -> std::io::Result<()>;
}

/// Render into a `String` instead of a writer.
pub fn render_to_string<F: OutputFormatter>(formatter: &F, graph: &Graph) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    formatter.format(graph, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
