//! Shared `reqwest` plumbing for the provider clients.

use std::time::Duration;

use anyhow::{bail, Context};
use tracing::error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn build_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}

/// Turn a non-2xx response into an error carrying the status and body.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    error!(provider, status = %status, body = %body, "API error");
    bail!("{status}: {body}")
}
