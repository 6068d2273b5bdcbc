//! Configuration schema.
//!
//! Hierarchy: `Config` → `ServerConfig`, `ProviderConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration, built once at startup and read-only afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
}

impl Config {
    /// Check the invariants that must hold before anything binds.
    ///
    /// A missing model is fatal. A missing API key is not: the caller is
    /// expected to warn via [`ProviderConfig::is_configured`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// Listener and lifecycle settings for both transports.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Interface both listeners bind to.
    pub host: String,
    /// gRPC listener port.
    pub port: u16,
    /// HTTP/JSON listener port.
    pub http_port: u16,
    /// How long in-flight requests get to finish after a shutdown signal.
    pub shutdown_grace_secs: u64,
    /// Directory served under `/swagger/`.
    pub docs_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            http_port: 8090,
            shutdown_grace_secs: 10,
            docs_dir: "docs/openapi".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// Credentials and endpoints for the upstream LLM providers.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key sent to whichever provider the model selects.
    pub api_key: String,
    /// Default model identifier, e.g. `"gemini-2.0-flash"`.
    pub model: String,
    /// Override for the Gemini API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_base: Option<String>,
    /// Override for the OpenAI API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether an API key was supplied.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &if self.is_configured() { "<set>" } else { "<unset>" })
            .field("model", &self.model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("openai_api_base", &self.openai_api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.http_port, 8090);
        assert_eq!(config.server.shutdown_grace(), Duration::from_secs(10));
        assert_eq!(config.server.grpc_addr(), "0.0.0.0:8080");
        assert_eq!(config.server.http_addr(), "0.0.0.0:8090");
        assert!(!config.provider.is_configured());
    }

    #[test]
    fn test_validate_requires_model() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingModel)));

        config.provider.model = "   ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingModel)));

        config.provider.model = "gemini-2.0-flash".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_not_fatal() {
        let mut config = Config::default();
        config.provider.model = "gpt-4o".to_string();
        assert!(config.validate().is_ok());
        assert!(!config.provider.is_configured());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let provider = ProviderConfig {
            api_key: "sk-secret".to_string(),
            model: "gpt-4o".to_string(),
            ..Default::default()
        };
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<set>"));
    }

    #[test]
    fn test_serialized_json_uses_camel_case() {
        let raw = serde_json::to_value(Config::default()).unwrap();
        assert!(raw["server"].get("httpPort").is_some());
        assert!(raw["server"].get("http_port").is_none());
        assert!(raw["provider"].get("apiKey").is_some());
    }
}
