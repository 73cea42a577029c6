use crate::api::compile_str;
use crate::cli::{CompileArgs, OutputFormat};
use crate::fs::{FileSystem, STDIN_PATH, default_fs};
use crate::output::{JsonOutput, MarkdownOutput, render_to_string};
use crate::style;
use std::io::{self, Write};
use std::path::Path;

use super::{CommandContext, read_input, report_compile_error};

pub fn cmd_compile(args: CompileArgs, ctx: CommandContext) -> i32 {
    cmd_compile_with_fs(args, ctx, default_fs())
}

pub fn cmd_compile_with_fs(args: CompileArgs, ctx: CommandContext, fs: &dyn FileSystem) -> i32 {
    let mut ctx = ctx.with_tier(args.tier);
    if let Some(edge_style) = args.edge_style {
        ctx.config.compile.edge_style = edge_style;
    }

    let text = match read_input(fs, &args.file) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let graph = match compile_str(&text, &ctx.config) {
        Ok(graph) => graph,
        Err(e) => {
            report_compile_error(&e, ctx.config.limits.tier);
            return 1;
        }
    };

    let title = if args.file == Path::new(STDIN_PATH) {
        "stdin".to_string()
    } else {
        args.file.display().to_string()
    };
    let rendered = match args.format {
        OutputFormat::Json => render_to_string(&JsonOutput::new(), &graph),
        OutputFormat::Markdown => render_to_string(&MarkdownOutput::new(title), &graph),
    };
    let rendered = match rendered {
        Ok(r) => r,
        Err(e) => {
            style::error(&format!("Failed to format output: {}", e));
            return 1;
        }
    };

    match &args.output {
        Some(output_path) => {
            if let Err(e) = fs.write(output_path, &rendered) {
                style::error(&format!("Could not write output file: {}", e));
                return 1;
            }
            style::success(&format!(
                "Wrote {} nodes and {} edges to {}",
                graph.node_count(),
                graph.edge_count(),
                style::path(output_path)
            ));
        }
        None => {
            // Render markdown nicely to terminal, or write plain text to a pipe
            let mut stdout = io::stdout();
            let write_result = if args.format == OutputFormat::Markdown {
                style::render_markdown(&rendered, &mut stdout)
            } else {
                write!(stdout, "{}", rendered)
            };
            if let Err(e) = write_result {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
        }
    }

    0
}
