use crate::model::EdgeStyle;
use crate::policy::Tier;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jsonviz")]
#[command(about = "Compile JSON documents into positioned node-link diagrams")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding .jsonviz.toml (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compile a JSON file into a diagram
    Compile(CompileArgs),

    /// Print the JSON subtree behind a node label
    Inspect(InspectArgs),

    /// Show the path from the root to a node
    Trace(TraceArgs),

    /// Serve the diagram over HTTP for an interactive renderer
    Serve(ServeArgs),

    /// Generate a starter .jsonviz.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CompileArgs {
    /// JSON file to compile ("-" reads stdin)
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Edge style tag copied onto every edge (default, smoothstep, step, straight)
    #[arg(long)]
    pub edge_style: Option<EdgeStyle>,

    /// Input limit tier (free, premium)
    #[arg(long)]
    pub tier: Option<Tier>,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// JSON file to read ("-" reads stdin)
    pub file: PathBuf,

    /// Node label or path, e.g. "Root", "address" or "employees > 0 > skills"
    pub label: String,
}

#[derive(Parser, Debug, Clone)]
pub struct TraceArgs {
    /// JSON file to compile ("-" reads stdin)
    pub file: PathBuf,

    /// Node id, e.g. node-3
    pub node_id: String,

    /// Input limit tier (free, premium)
    #[arg(long)]
    pub tier: Option<Tier>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// JSON file to load at startup
    pub file: Option<PathBuf>,

    /// Port for HTTP server (defaults to the configured port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Recompile when the file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Input limit tier (free, premium)
    #[arg(long)]
    pub tier: Option<Tier>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .jsonviz.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_args() {
        let cli = Cli::parse_from([
            "jsonviz",
            "compile",
            "data.json",
            "-f",
            "markdown",
            "--edge-style",
            "smoothstep",
            "--tier",
            "premium",
        ]);
        let Command::Compile(args) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.file, PathBuf::from("data.json"));
        assert_eq!(args.format, OutputFormat::Markdown);
        assert_eq!(args.edge_style, Some(EdgeStyle::SmoothStep));
        assert_eq!(args.tier, Some(Tier::Premium));
    }

    #[test]
    fn test_bad_edge_style_is_rejected() {
        let result = Cli::try_parse_from(["jsonviz", "compile", "-", "--edge-style", "wavy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inspect_label_with_separators() {
        let cli = Cli::parse_from(["jsonviz", "inspect", "-", "employees > 0"]);
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.label, "employees > 0");
        assert_eq!(cli.config_dir, PathBuf::from("."));
    }
}
