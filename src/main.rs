use clap::Parser;
use jsonviz::cli::{Cli, Command};
use jsonviz::commands::CommandContext;
use jsonviz::{cmd_compile, cmd_init, cmd_inspect, cmd_serve, cmd_trace};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so compiled output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jsonviz=info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let exit_code = match cli.command {
        Command::Compile(args) => cmd_compile(args, CommandContext::new(&cli.config_dir)),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Trace(args) => cmd_trace(args, CommandContext::new(&cli.config_dir)),
        Command::Serve(args) => cmd_serve(args, CommandContext::new(&cli.config_dir)),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
