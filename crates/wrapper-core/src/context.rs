//! Request context: the cancellation and deadline that travel with one call.
//!
//! Each inbound request gets its own context. The transport derives the token
//! from the gateway's force-cancel token, so shutdown can abandon in-flight
//! provider calls once the grace period is over.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::GatewayError;

#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Set the deadline to `now + timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The reason this context is done, if it is.
    pub fn err(&self) -> Option<GatewayError> {
        if self.cancel.is_cancelled() {
            return Some(GatewayError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(GatewayError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` until it completes or the context ends, whichever comes
    /// first. On cancellation the future is dropped, abandoning its work.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, GatewayError>
    where
        F: Future<Output = T>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(GatewayError::Canceled),
            _ = expired => Err(GatewayError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

/// Parse a `grpc-timeout` header value: up to 8 ASCII digits followed by one
/// of `H`, `M`, `S`, `m` (millis), `u` (micros), `n` (nanos).
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let value = value.trim();
    if !value.is_ascii() || value.len() < 2 || value.len() > 9 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(amount * 60 * 60),
        "M" => Duration::from_secs(amount * 60),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(duration)
}
