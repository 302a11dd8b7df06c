use std::path::PathBuf;
use std::time::Duration;

use harvest_core::config_file::ConfigFile;
use harvest_core::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_Y_TOLERANCE};
use harvest_parsing::{ParsingConfig, ParsingConfigBuilder};

pub const DEFAULT_DATA_DIR: &str = "data";

/// Values from the environment that can override the config file.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub data_dir: Option<String>,
    pub user_agent: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("HARVEST_DATA_DIR").ok().filter(|v| !v.is_empty()),
            user_agent: std::env::var("HARVEST_USER_AGENT")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

/// Resolved run settings: CLI flags > env vars > config file > defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub timeout: Duration,
    pub y_tolerance: f32,
}

/// Window overrides given on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowFlags {
    pub id_window: Option<usize>,
    pub type_window: Option<usize>,
    pub accept_advance: Option<usize>,
}

impl Settings {
    pub fn resolve(file: &ConfigFile, env: &EnvOverrides, data_dir_flag: Option<PathBuf>) -> Self {
        let http = file.http.as_ref();
        let data_dir = data_dir_flag
            .or_else(|| env.data_dir.as_ref().map(PathBuf::from))
            .or_else(|| {
                file.output
                    .as_ref()
                    .and_then(|o| o.data_dir.as_ref())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let user_agent = env
            .user_agent
            .clone()
            .or_else(|| http.and_then(|h| h.user_agent.clone()))
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let timeout = Duration::from_secs(
            http.and_then(|h| h.timeout_secs)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        );
        let y_tolerance = file
            .heritage
            .as_ref()
            .and_then(|h| h.y_tolerance)
            .unwrap_or(DEFAULT_Y_TOLERANCE);

        Self {
            data_dir,
            user_agent,
            timeout,
            y_tolerance,
        }
    }
}

/// Build the heritage parsing config from the file's `[heritage]` section and flags.
pub fn parsing_config(
    file: &ConfigFile,
    flags: WindowFlags,
) -> Result<ParsingConfig, harvest_parsing::ParsingError> {
    let heritage = file.heritage.clone().unwrap_or_default();
    let mut builder = ParsingConfigBuilder::new();

    if let Some(n) = flags.id_window.or(heritage.id_window) {
        builder = builder.id_window(n);
    }
    if let Some(n) = flags.type_window.or(heritage.type_window) {
        builder = builder.type_window(n);
    }
    if let Some(n) = flags.accept_advance.or(heritage.accept_advance) {
        builder = builder.accept_advance(n);
    }
    for pattern in heritage.extra_header_patterns.unwrap_or_default() {
        builder = builder.add_header_pattern(pattern);
    }

    Ok(builder.build()?)
}
