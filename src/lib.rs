pub mod api;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod fs;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod output;
pub mod policy;
pub mod resolver;
pub mod server;
pub mod style;
pub mod worker;

pub use api::{JsonVizError, TraceResult, compile_source, compile_str, inspect, trace};
pub use cli::Cli;
pub use commands::{cmd_compile, cmd_init, cmd_inspect, cmd_serve, cmd_trace};
pub use compiler::{CompileError, CompileOptions, compile};
pub use config::Config;
pub use interaction::{GraphSession, Highlight};
pub use layout::{LayoutConfig, LayoutEngine};
pub use model::{Graph, GraphEdge, GraphNode};
pub use resolver::{ResolveError, Resolved, resolve};
