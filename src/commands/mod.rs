mod compile;
mod init;
mod inspect;
mod serve;
mod trace;

pub use compile::{cmd_compile, cmd_compile_with_fs};
pub use init::{cmd_init, cmd_init_with_fs};
pub use inspect::{cmd_inspect, cmd_inspect_with_fs};
pub use serve::cmd_serve;
pub use trace::{cmd_trace, cmd_trace_with_fs};

use crate::api::JsonVizError;
use crate::config::Config;
use crate::fs::{FileSystem, STDIN_PATH, default_fs};
use crate::policy::{PolicyError, Tier};
use crate::style;
use std::path::Path;

/// Shared context for command execution, reducing boilerplate across commands.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    /// Load `.jsonviz.toml` from `config_dir`. A broken config file is
    /// reported and replaced by defaults.
    pub fn new(config_dir: &Path) -> Self {
        Self::new_with_fs(config_dir, default_fs())
    }

    pub fn new_with_fs(config_dir: &Path, fs: &dyn FileSystem) -> Self {
        let config = Config::load_with_fs(config_dir, fs).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });
        Self { config }
    }

    pub fn with_tier(mut self, tier: Option<Tier>) -> Self {
        if let Some(tier) = tier {
            self.config.limits.tier = tier;
        }
        self
    }
}

/// Read a JSON input file, or stdin for `-`. Returns Err(exit_code) on failure.
fn read_input(fs: &dyn FileSystem, file: &Path) -> Result<String, i32> {
    fs.read_to_string(file).map_err(|e| {
        if file == Path::new(STDIN_PATH) {
            style::error(&format!("Could not read stdin: {}", e));
        } else {
            style::error(&format!("Could not read {}: {}", style::path(file), e));
        }
        1
    })
}

/// Print a compile failure with a hint about how to get past it.
fn report_compile_error(error: &JsonVizError, tier: Tier) {
    style::error(&error.to_string());
    match error {
        JsonVizError::Policy(PolicyError::Parse(_)) => {
            style::hint("The input must be a single valid JSON document");
        }
        JsonVizError::Policy(_) if tier == Tier::Free => {
            style::hint("Larger documents are accepted with --tier premium");
        }
        JsonVizError::Compile(_) => {
            style::hint("Raise [compile] max_depth or max_nodes in .jsonviz.toml");
        }
        _ => {}
    }
}
