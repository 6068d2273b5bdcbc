//! Gateway lifecycle: both transports up, both transports down.
//!
//! Startup binds the gRPC and HTTP listeners before serving anything, so a
//! port conflict on either fails the whole start. Shutdown stops both
//! transports concurrently. Each gets the grace period to drain its in-flight
//! requests; past that, the force token cancels every outstanding request
//! context and a transport that still has not finished is aborted.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use wrapper_core::config::ServerConfig;

use crate::error::StartupError;
use crate::grpc::{self, GrpcFront};
use crate::http::{self, HttpState};
use crate::service::GenerateService;

/// How long a transport gets to wind down after its requests were
/// force-cancelled.
const FORCE_DRAIN: Duration = Duration::from_secs(1);

/// How one transport ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Drained within the grace period.
    Graceful,
    /// Grace period ran out; outstanding requests were cancelled.
    Forced,
    /// The server task failed or had to be aborted.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub grpc: StopOutcome,
    pub http: StopOutcome,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        !matches!(self.grpc, StopOutcome::Failed(_)) && !matches!(self.http, StopOutcome::Failed(_))
    }
}

// ─────────────────────────────────────────────
// ServerHandle
// ─────────────────────────────────────────────

/// A spawned transport. Dropping the handle stops the server.
#[derive(Debug)]
pub struct ServerHandle {
    name: &'static str,
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: Option<JoinHandle<anyhow::Result<()>>>,
}

impl ServerHandle {
    fn spawn<F>(name: &'static str, addr: SocketAddr, shutdown: CancellationToken, server: F) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name,
            addr,
            shutdown,
            task: Some(tokio::spawn(server)),
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting, drain for up to `grace`, then force.
    async fn stop(mut self, grace: Duration, force: &CancellationToken) -> StopOutcome {
        self.shutdown.cancel();
        let Some(mut task) = self.task.take() else {
            return StopOutcome::Graceful;
        };

        match timeout(grace, &mut task).await {
            Ok(result) => self.finished(result, StopOutcome::Graceful),
            Err(_) => {
                warn!(server = self.name, ?grace, "Grace period elapsed, cancelling in-flight requests");
                force.cancel();
                match timeout(FORCE_DRAIN, &mut task).await {
                    Ok(result) => self.finished(result, StopOutcome::Forced),
                    Err(_) => {
                        task.abort();
                        error!(server = self.name, "Server did not stop, aborted");
                        StopOutcome::Failed("aborted after grace period".to_string())
                    }
                }
            }
        }
    }

    fn finished(
        &self,
        result: Result<anyhow::Result<()>, tokio::task::JoinError>,
        ok: StopOutcome,
    ) -> StopOutcome {
        match result {
            Ok(Ok(())) => {
                info!(server = self.name, "Server stopped");
                ok
            }
            Ok(Err(e)) => {
                error!(server = self.name, error = %e, "Server exited with error");
                StopOutcome::Failed(format!("{e:#}"))
            }
            Err(e) => {
                error!(server = self.name, error = %e, "Server task panicked");
                StopOutcome::Failed(e.to_string())
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// Both transports over one [`GenerateService`].
#[derive(Debug)]
pub struct Gateway {
    grpc: ServerHandle,
    http: ServerHandle,
    force: CancellationToken,
    failed: CancellationToken,
    grace: Duration,
}

impl Gateway {
    /// Bind both listeners and start serving.
    ///
    /// # Errors
    /// [`StartupError::Bind`] if either address cannot be bound. Nothing is
    /// served in that case.
    pub async fn start(
        config: &ServerConfig,
        service: Arc<GenerateService>,
    ) -> Result<Self, StartupError> {
        let grpc_listener = bind(config.grpc_addr()).await?;
        let http_listener = bind(config.http_addr()).await?;
        let grpc_addr = local_addr(&grpc_listener, config.grpc_addr())?;
        let http_addr = local_addr(&http_listener, config.http_addr())?;

        let force = CancellationToken::new();
        let failed = CancellationToken::new();

        let grpc_shutdown = CancellationToken::new();
        let grpc = {
            let front = GrpcFront::new(service.clone(), force.clone());
            let shutdown = grpc_shutdown.clone();
            let failed = failed.clone();
            ServerHandle::spawn("grpc", grpc_addr, grpc_shutdown, async move {
                grpc::serve(grpc_listener, front, shutdown)
                    .await
                    .inspect_err(|_| failed.cancel())
                    .map_err(anyhow::Error::from)
            })
        };

        let http_shutdown = CancellationToken::new();
        let http = {
            let router = http::router(HttpState::new(service, force.clone()), &config.docs_dir);
            let shutdown = http_shutdown.clone();
            let failed = failed.clone();
            ServerHandle::spawn("http", http_addr, http_shutdown, async move {
                http::serve(http_listener, router, shutdown)
                    .await
                    .inspect_err(|_| failed.cancel())
                    .map_err(anyhow::Error::from)
            })
        };

        Ok(Self {
            grpc,
            http,
            force,
            failed,
            grace: config.shutdown_grace(),
        })
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn grpc_addr(&self) -> SocketAddr {
        self.grpc.local_addr()
    }

    pub fn http_addr(&self) -> SocketAddr {
        self.http.local_addr()
    }

    /// Serve until `signal` resolves, then shut down.
    ///
    /// # Errors
    /// If a transport stops on its own before the signal, the other one is
    /// shut down too and an error is returned.
    pub async fn run_until<F>(self, signal: F) -> anyhow::Result<ShutdownReport>
    where
        F: Future<Output = ()>,
    {
        let failed = self.failed.clone();
        let server_failed = tokio::select! {
            _ = signal => false,
            _ = failed.cancelled() => true,
        };

        let report = self.shutdown().await;
        if server_failed {
            anyhow::bail!("a server stopped unexpectedly: {report:?}");
        }
        Ok(report)
    }

    /// Stop both transports concurrently.
    pub async fn shutdown(self) -> ShutdownReport {
        info!(grace = ?self.grace, "Shutting down servers gracefully...");
        let Self {
            grpc,
            http,
            force,
            grace,
            ..
        } = self;

        let (grpc, http) = tokio::join!(grpc.stop(grace, &force), http.stop(grace, &force));
        let report = ShutdownReport { grpc, http };
        if report.is_clean() {
            info!("Servers stopped");
        } else {
            warn!(?report, "Servers stopped with errors");
        }
        report
    }
}

async fn bind(addr: String) -> Result<TcpListener, StartupError> {
    TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

fn local_addr(listener: &TcpListener, addr: String) -> Result<SocketAddr, StartupError> {
    listener
        .local_addr()
        .map_err(|source| StartupError::Bind { addr, source })
}
