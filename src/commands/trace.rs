use crate::api::trace;
use crate::cli::TraceArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::{CommandContext, read_input, report_compile_error};

pub fn cmd_trace(args: TraceArgs, ctx: CommandContext) -> i32 {
    cmd_trace_with_fs(args, ctx, default_fs())
}

pub fn cmd_trace_with_fs(args: TraceArgs, ctx: CommandContext, fs: &dyn FileSystem) -> i32 {
    let ctx = ctx.with_tier(args.tier);

    let text = match read_input(fs, &args.file) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let (graph, result) = match trace(&text, &args.node_id, &ctx.config) {
        Ok(found) => found,
        Err(crate::api::JsonVizError::UnknownNode(id)) => {
            style::error(&format!("No node with id '{}'", id));
            style::hint("Node ids look like node-0, node-1, ... in compile order");
            return 1;
        }
        Err(e) => {
            report_compile_error(&e, ctx.config.limits.tier);
            return 1;
        }
    };

    style::header(&format!("{} ({})", result.node.label, style::node_id(&result.node.id)));
    println!("{}", style::metric("json path", result.node.breadcrumb()));
    println!("{}", style::metric("diagram path", result.path_labels(&graph).join(" → ")));
    println!("{}", style::metric("ancestors", result.trace.nodes.len()));

    style::section("Path edges");
    for edge_id in &result.trace.path_edges {
        println!("  {}", edge_id);
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    fn args(node_id: &str) -> TraceArgs {
        TraceArgs {
            file: PathBuf::from("/doc.json"),
            node_id: node_id.to_string(),
            tier: None,
        }
    }

    #[test]
    fn test_trace_known_and_unknown_nodes() {
        let fs = MockFs::with_files([(Path::new("/doc.json"), r#"{"a": {"b": {"c": 1}}}"#)]);
        assert_eq!(cmd_trace_with_fs(args("node-2"), CommandContext::default(), &fs), 0);
        assert_eq!(cmd_trace_with_fs(args("node-7"), CommandContext::default(), &fs), 1);
    }

    #[test]
    fn test_trace_invalid_json() {
        let fs = MockFs::with_files([(Path::new("/doc.json"), "{")]);
        assert_eq!(cmd_trace_with_fs(args("node-0"), CommandContext::default(), &fs), 1);
    }
}
