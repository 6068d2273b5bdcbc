//! Per-request error taxonomy.
//!
//! Both transports map from [`ErrorCode`] rather than matching on variants,
//! so the gRPC status and the HTTP status always agree.

use thiserror::Error;

/// Transport-neutral error class. Discriminants follow the gRPC status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Canceled = 1,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    Internal = 13,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Everything a single `GenerateText` call can fail with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// Bad input, rejected before any provider is contacted.
    #[error("{0}")]
    InvalidArgument(String),

    /// The caller (or shutdown) cancelled the request.
    #[error("request canceled")]
    Canceled,

    /// The request deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The provider answered but produced no text.
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    /// The provider call itself failed.
    #[error("{provider} generation failed: {detail}")]
    Provider {
        provider: &'static str,
        detail: String,
    },
}

impl GatewayError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        GatewayError::InvalidArgument(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            GatewayError::Canceled => ErrorCode::Canceled,
            GatewayError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            GatewayError::EmptyResponse { .. } | GatewayError::Provider { .. } => {
                ErrorCode::Internal
            }
        }
    }
}
