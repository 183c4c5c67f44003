//! Configuration resolution.
//!
//! Order: explicit path → `SKYSENSE_CONFIG` → `$XDG_CONFIG_HOME/skysense/config.json`
//! → built-in defaults. Environment overrides are applied last.

use crate::pipeline::PipelineConfig;
use crate::validate::ValidationError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Env var naming an explicit config file.
pub const ENV_CONFIG_PATH: &str = "SKYSENSE_CONFIG";
/// Env var overriding the geocoder endpoint.
pub const ENV_GEOCODER_URL: &str = "SKYSENSE_GEOCODER_URL";
/// Env var disabling reverse geocoding when set to `1`/`true`.
pub const ENV_OFFLINE: &str = "SKYSENSE_OFFLINE";

const CONFIG_DIR: &str = "skysense";
const CONFIG_FILE: &str = "config.json";

/// Errors from configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

impl From<ConfigError> for sky_common::Error {
    fn from(err: ConfigError) -> Self {
        sky_common::Error::Config(err.to_string())
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

/// The effective configuration and its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub config: PipelineConfig,
    pub source: ConfigSource,
    /// Names of environment overrides that were applied.
    pub overrides: Vec<&'static str>,
}

/// Resolve configuration from the process environment.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    resolve_config_with(explicit, dirs::config_dir(), |key| std::env::var(key).ok())
}

/// Resolve configuration with an injected environment lookup and config root.
pub fn resolve_config_with<F>(
    explicit: Option<&Path>,
    config_root: Option<PathBuf>,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let source = if let Some(path) = explicit {
        ConfigSource::Explicit(path.to_path_buf())
    } else if let Some(path) = env(ENV_CONFIG_PATH).filter(|p| !p.trim().is_empty()) {
        ConfigSource::Env(PathBuf::from(path))
    } else {
        match config_root.map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE)) {
            Some(path) if path.exists() => ConfigSource::Xdg(path),
            _ => ConfigSource::Defaults,
        }
    };

    let mut config = match &source {
        ConfigSource::Explicit(path) | ConfigSource::Env(path) | ConfigSource::Xdg(path) => {
            load_from_path(path)?
        }
        ConfigSource::Defaults => {
            debug!("no config file found, using defaults");
            PipelineConfig::default()
        }
    };

    let overrides = apply_env_overrides(&mut config, &env);
    config.validate().map_err(ConfigError::Invalid)?;

    info!(source = ?source, overrides = ?overrides, "configuration resolved");
    Ok(ResolvedConfig {
        config,
        source,
        overrides,
    })
}

/// Load and parse a single configuration file.
pub fn load_from_path(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides<F>(config: &mut PipelineConfig, env: &F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    if let Some(url) = env(ENV_GEOCODER_URL).filter(|u| !u.trim().is_empty()) {
        config.geocoder.endpoint = url.trim().to_string();
        applied.push(ENV_GEOCODER_URL);
    }
    if let Some(flag) = env(ENV_OFFLINE) {
        if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
            config.geocoder.enabled = false;
            applied.push(ENV_OFFLINE);
        }
    }
    applied
}
