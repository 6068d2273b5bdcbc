//! Core building blocks shared by every Wrapper crate.
//!
//! - [`config`]: typed configuration, file/env/flag layering
//! - [`error`]: the per-request error taxonomy and its transport-neutral codes
//! - [`context`]: cancellation + deadline carried by each request
//! - [`types`]: the `GenerateText` request and response

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::{Config, ConfigError, ConfigOverrides};
pub use context::RequestContext;
pub use error::{ErrorCode, GatewayError};
pub use types::{GenerateRequest, GenerateResponse};
