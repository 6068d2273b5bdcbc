//! Serve command: config, provider clients, both transports, signal wait.
//!
//! Startup sequence:
//! 1. Load config (file, env, flags) and validate it
//! 2. Build the provider clients
//! 3. Bind gRPC and HTTP listeners and start serving
//! 4. Wait for SIGINT/SIGTERM, then shut down with the grace period

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use wrapper_core::config::load_config;
use wrapper_core::ConfigOverrides;
use wrapper_providers::Dispatcher;
use wrapper_server::{Gateway, GenerateService};

use crate::helpers;

/// Run the gateway until a shutdown signal arrives.
pub async fn run(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<()> {
    // 1. Config
    let mut config = overrides.apply(load_config(config_path)?);
    config.validate()?;
    config.server.docs_dir = helpers::expand_tilde(&config.server.docs_dir)
        .to_string_lossy()
        .into_owned();

    if !config.provider.is_configured() {
        warn!("No API key provided (use --api-key or API_KEY); provider calls will fail");
        helpers::print_warning("No API key set. Provider calls will be rejected upstream.");
    }

    // 2. Provider clients
    let dispatcher = Dispatcher::from_config(&config.provider)
        .context("failed to create provider clients")?;
    let service = Arc::new(GenerateService::new(dispatcher, &config.provider.model));

    // 3. Listeners
    let gateway = Gateway::start(&config.server, service).await?;

    info!(
        model = %config.provider.model,
        grpc = %gateway.grpc_addr(),
        http = %gateway.http_addr(),
        "gateway starting"
    );
    helpers::print_banner(&config.provider.model, gateway.grpc_addr(), gateway.http_addr());

    // 4. Serve until signalled
    let report = gateway.run_until(shutdown_signal()).await?;
    if !report.is_clean() {
        warn!(?report, "shutdown finished with errors");
    }

    println!("  Gateway stopped. Goodbye!");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
    println!();
    println!("  Shutting down...");
}
