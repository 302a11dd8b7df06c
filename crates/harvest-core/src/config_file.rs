use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub heritage: Option<HeritageConfig>,
    pub http: Option<HttpConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeritageConfig {
    pub id_window: Option<usize>,
    pub type_window: Option<usize>,
    pub accept_advance: Option<usize>,
    pub y_tolerance: Option<f32>,
    pub extra_header_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_dir: Option<String>,
}

/// Platform config directory path: `<config_dir>/harvest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("harvest").join("config.toml"))
}

/// Load config by cascading CWD `.harvest.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".harvest.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Take a field from `overlay` if set, otherwise from `base`.
fn pick<S, T>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        heritage: Some(HeritageConfig {
            id_window: pick(&overlay.heritage, &base.heritage, |h| h.id_window),
            type_window: pick(&overlay.heritage, &base.heritage, |h| h.type_window),
            accept_advance: pick(&overlay.heritage, &base.heritage, |h| h.accept_advance),
            y_tolerance: pick(&overlay.heritage, &base.heritage, |h| h.y_tolerance),
            extra_header_patterns: pick(&overlay.heritage, &base.heritage, |h| {
                h.extra_header_patterns.clone()
            }),
        }),
        http: Some(HttpConfig {
            user_agent: pick(&overlay.http, &base.http, |h| h.user_agent.clone()),
            timeout_secs: pick(&overlay.http, &base.http, |h| h.timeout_secs),
        }),
        output: Some(OutputConfig {
            data_dir: pick(&overlay.output, &base.output, |o| o.data_dir.clone()),
        }),
    }
}
