use crate::cli::ServeArgs;
use crate::fs::{FileSystem, RealFs, default_fs};
use crate::server::{self, AppState};
use crate::style;
use crate::worker::CompileWorker;
use std::sync::Arc;
use std::time::Duration;

use super::{CommandContext, read_input};

const WATCH_INTERVAL: Duration = Duration::from_millis(500);

pub fn cmd_serve(args: ServeArgs, ctx: CommandContext) -> i32 {
    let ctx = ctx.with_tier(args.tier);

    if args.watch && args.file.is_none() {
        style::error("--watch needs a file to watch");
        return 1;
    }

    // Watch mode submits the file on its first poll
    let initial = match &args.file {
        Some(file) if !args.watch => match read_input(default_fs(), file) {
            Ok(text) => Some(text),
            Err(code) => return code,
        },
        _ => None,
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to create tokio runtime: {}", e));
            return 1;
        }
    };

    let port = args.port.unwrap_or(ctx.config.server.port);
    let debounce = Duration::from_millis(ctx.config.server.debounce_ms);

    let result = rt.block_on(async {
        let worker = CompileWorker::spawn(ctx.config.compile_options(), ctx.config.active_limits(), debounce);

        if let Some(text) = initial {
            worker.submit(text);
        }
        if let (true, Some(file)) = (args.watch, &args.file) {
            style::status(&format!("Watching {} for changes", style::path(file)));
            let fs: Arc<dyn FileSystem> = Arc::new(RealFs::new());
            tokio::spawn(server::watch_file(file.clone(), fs, worker.clone(), WATCH_INTERVAL));
        }

        let state = Arc::new(AppState::new(
            worker,
            ctx.config.compile_options(),
            ctx.config.active_limits(),
        ));
        server::serve(state, port, args.open).await
    });

    if let Err(e) = result {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
