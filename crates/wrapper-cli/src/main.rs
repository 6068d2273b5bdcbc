//! Wrapper CLI: entry point.
//!
//! `wrapper [--config FILE] [--port N] [--http-port N] [--model ID] ...`
//!
//! Serves `wrapper.v1.AiService` over gRPC and HTTP/JSON until SIGINT or
//! SIGTERM, then shuts both transports down.

mod gateway;
mod helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use wrapper_core::ConfigOverrides;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// LLM gateway: one GenerateText call over gRPC and HTTP, routed to Gemini
/// or OpenAI by model name.
#[derive(Parser, Debug)]
#[command(name = "wrapper", version, about, long_about = None)]
struct Cli {
    /// JSON config file (camelCase keys, all optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface both listeners bind to
    #[arg(long)]
    host: Option<String>,

    /// gRPC port
    #[arg(short, long)]
    port: Option<u16>,

    /// HTTP/JSON port
    #[arg(long)]
    http_port: Option<u16>,

    /// Seconds in-flight requests get to finish on shutdown
    #[arg(long = "shutdown-grace", value_name = "SECS")]
    shutdown_grace_secs: Option<u64>,

    /// Directory served under /swagger/
    #[arg(long)]
    docs_dir: Option<String>,

    /// Provider API key
    #[arg(long)]
    api_key: Option<String>,

    /// Default model, e.g. gemini-2.0-flash or gpt-4o
    #[arg(short, long)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            http_port: self.http_port,
            shutdown_grace_secs: self.shutdown_grace_secs,
            docs_dir: self.docs_dir.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
        }
    }
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before logging so RUST_LOG from .env applies.
    let dotenv = dotenvy::dotenv();
    init_logging(cli.logs);
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env loaded: {e}"),
    }

    let config_path = cli
        .config
        .as_deref()
        .map(|p| helpers::expand_tilde(&p.to_string_lossy()));
    gateway::run(config_path.as_deref(), cli.overrides()).await
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("wrapper=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
