//! Config loader: reads an optional JSON file, merges env vars, then flags.
//!
//! # Loading precedence (lowest to highest)
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file given with `--config`
//! 3. Environment variables (`PORT`, `API_KEY`, `MODEL`, …)
//! 4. Command-line flags that were actually passed

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::schema::Config;
use super::ConfigError;

/// Load configuration from an optional file plus the process environment.
///
/// Flags are applied separately via [`ConfigOverrides::apply`] so that they
/// win over the environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => load_config_from_path(path)?,
        None => Config::default(),
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path. An explicit file that can't be
/// read or parsed is an error, not a silent fallback.
fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    debug!("Loading config from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply environment variable overrides on top of a loaded config.
///
/// `lookup` abstracts `std::env::var` so the mapping can be tested without
/// touching process state. Empty values count as unset.
///
/// Supported variables:
/// - `HOST`, `PORT`, `HTTP_PORT`, `SHUTDOWN_GRACE_SECS`, `DOCS_DIR`
/// - `API_KEY`, `MODEL`
/// - `GEMINI_API_BASE`, `OPENAI_API_BASE`
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    // Server
    if let Some(val) = get("HOST") {
        config.server.host = val;
    }
    if let Some(val) = get("PORT") {
        config.server.port = parse_env("PORT", val)?;
    }
    if let Some(val) = get("HTTP_PORT") {
        config.server.http_port = parse_env("HTTP_PORT", val)?;
    }
    if let Some(val) = get("SHUTDOWN_GRACE_SECS") {
        config.server.shutdown_grace_secs = parse_env("SHUTDOWN_GRACE_SECS", val)?;
    }
    if let Some(val) = get("DOCS_DIR") {
        config.server.docs_dir = val;
    }

    // Provider
    if let Some(val) = get("API_KEY") {
        config.provider.api_key = val;
    }
    if let Some(val) = get("MODEL") {
        config.provider.model = val;
    }
    if let Some(val) = get("GEMINI_API_BASE") {
        config.provider.gemini_api_base = Some(val);
    }
    if let Some(val) = get("OPENAI_API_BASE") {
        config.provider.openai_api_base = Some(val);
    }

    Ok(config)
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

// ─────────────────────────────────────────────
// Flag overrides
// ─────────────────────────────────────────────

/// Values given explicitly on the command line. `None` means "flag not
/// passed", which leaves the env/file/default value in place.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub http_port: Option<u16>,
    pub shutdown_grace_secs: Option<u64>,
    pub docs_dir: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(port) = self.http_port {
            config.server.http_port = port;
        }
        if let Some(secs) = self.shutdown_grace_secs {
            config.server.shutdown_grace_secs = secs;
        }
        if let Some(dir) = self.docs_dir {
            config.server.docs_dir = dir;
        }
        if let Some(key) = self.api_key {
            config.provider.api_key = key;
        }
        if let Some(model) = self.model {
            config.provider.model = model;
        }
        config
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
