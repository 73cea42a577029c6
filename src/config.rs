use crate::compiler::CompileOptions;
use crate::fs::{FileSystem, default_fs};
use crate::layout::LayoutConfig;
use crate::model::EdgeStyle;
use crate::policy::{InputLimits, Tier};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".jsonviz.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub compile: CompileSettings,
    pub limits: LimitSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone)]
pub struct CompileSettings {
    pub max_depth: usize,
    pub max_nodes: usize,
    pub edge_style: EdgeStyle,
}

#[derive(Debug, Clone)]
pub struct LimitSettings {
    pub tier: Tier,
    pub free: InputLimits,
    pub premium: InputLimits,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub debounce_ms: u64,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_nodes: 10_000,
            edge_style: EdgeStyle::Default,
        }
    }
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            tier: Tier::Free,
            free: InputLimits::free(),
            premium: InputLimits::premium(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            debounce_ms: 800,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    layout: Option<RawLayout>,
    compile: Option<RawCompile>,
    limits: Option<RawLimits>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    node_width: Option<f64>,
    node_height: Option<f64>,
    margin: Option<f64>,
    fan_factor: Option<f64>,
    max_attempts: Option<usize>,
    fallback_step: Option<f64>,
    snap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCompile {
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
    edge_style: Option<EdgeStyle>,
}

#[derive(Debug, Deserialize)]
struct RawLimits {
    tier: Option<Tier>,
    free: Option<RawTierLimits>,
    premium: Option<RawTierLimits>,
}

#[derive(Debug, Deserialize)]
struct RawTierLimits {
    max_bytes: Option<usize>,
    max_lines: Option<usize>,
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    port: Option<u16>,
    debounce_ms: Option<u64>,
}

impl Config {
    pub fn load(project_path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(project_path, default_fs())
    }

    pub fn load_with_fs(project_path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = project_path.join(CONFIG_FILE_NAME);

        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let layout = match raw.layout {
            Some(l) => {
                let d = LayoutConfig::default();
                LayoutConfig {
                    node_width: l.node_width.unwrap_or(d.node_width),
                    node_height: l.node_height.unwrap_or(d.node_height),
                    margin: l.margin.unwrap_or(d.margin),
                    fan_factor: l.fan_factor.unwrap_or(d.fan_factor),
                    max_attempts: l.max_attempts.unwrap_or(d.max_attempts),
                    fallback_step: l.fallback_step.unwrap_or(d.fallback_step),
                    snap: l.snap.unwrap_or(d.snap),
                }
            }
            None => LayoutConfig::default(),
        };

        let compile = match raw.compile {
            Some(c) => {
                let d = CompileSettings::default();
                CompileSettings {
                    max_depth: c.max_depth.unwrap_or(d.max_depth),
                    max_nodes: c.max_nodes.unwrap_or(d.max_nodes),
                    edge_style: c.edge_style.unwrap_or(d.edge_style),
                }
            }
            None => CompileSettings::default(),
        };

        let limits = match raw.limits {
            Some(l) => LimitSettings {
                tier: l.tier.unwrap_or_default(),
                free: merge_limits(l.free, InputLimits::free()),
                premium: merge_limits(l.premium, InputLimits::premium()),
            },
            None => LimitSettings::default(),
        };

        let server = match raw.server {
            Some(s) => {
                let d = ServerSettings::default();
                ServerSettings {
                    port: s.port.unwrap_or(d.port),
                    debounce_ms: s.debounce_ms.unwrap_or(d.debounce_ms),
                }
            }
            None => ServerSettings::default(),
        };

        Ok(Self {
            layout,
            compile,
            limits,
            server,
        })
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            layout: self.layout.clone(),
            edge_style: self.compile.edge_style,
            max_depth: self.compile.max_depth,
            max_nodes: self.compile.max_nodes,
        }
    }

    /// Limits for the configured tier.
    pub fn active_limits(&self) -> InputLimits {
        self.limits.for_tier(self.limits.tier)
    }
}

impl LimitSettings {
    pub fn for_tier(&self, tier: Tier) -> InputLimits {
        match tier {
            Tier::Free => self.free,
            Tier::Premium => self.premium,
        }
    }
}

fn merge_limits(raw: Option<RawTierLimits>, defaults: InputLimits) -> InputLimits {
    match raw {
        Some(r) => InputLimits {
            max_bytes: r.max_bytes.unwrap_or(defaults.max_bytes),
            max_lines: r.max_lines.unwrap_or(defaults.max_lines),
            max_depth: r.max_depth.unwrap_or(defaults.max_depth),
            max_nodes: r.max_nodes.unwrap_or(defaults.max_nodes),
        },
        None => defaults,
    }
}

/// Starter `.jsonviz.toml` with every setting at its default.
pub fn generate_config_template() -> String {
    r#"# jsonviz configuration
# Every setting is optional; the values below are the defaults.

[layout]
node_width = 350
node_height = 150
margin = 30
# Gap between a parent and its children is margin * fan_factor
fan_factor = 3
max_attempts = 100
fallback_step = 50
snap = 10

[compile]
max_depth = 100
max_nodes = 10000
# default | smoothstep | step | straight
edge_style = "default"

[limits]
# free | premium
tier = "free"

[limits.free]
max_bytes = 102400
max_lines = 2000
max_depth = 20
max_nodes = 500

[limits.premium]
max_bytes = 10485760
max_lines = 200000
max_depth = 100
max_nodes = 10000

[server]
port = 3000
debounce_ms = 800
"#
    .to_string()
}
