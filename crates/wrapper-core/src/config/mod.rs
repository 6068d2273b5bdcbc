//! Configuration system: schema, loading, env var and flag overrides.
//!
//! # Usage
//! ```no_run
//! use wrapper_core::config;
//!
//! let cfg = config::load_config(None).unwrap();
//! println!("Model: {}", cfg.provider.model);
//! ```

pub mod loader;
pub mod schema;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{apply_env_overrides, load_config, ConfigOverrides};
pub use schema::{Config, ProviderConfig, ServerConfig};

/// Fatal configuration problems. Any of these stops the process before it binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("no model provided, e.g. gemini-2.0-flash (use --model or MODEL)")]
    MissingModel,
}
