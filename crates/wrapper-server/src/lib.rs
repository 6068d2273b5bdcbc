//! Network fronts for Wrapper.
//!
//! One [`GenerateService`] is exposed twice: as `wrapper.v1.AiService` over
//! gRPC and as `POST /api/v1/generate` over HTTP/JSON. [`Gateway`] owns both
//! listeners and their shutdown.

pub mod error;
pub mod gateway;
pub mod grpc;
pub mod http;
pub mod proto;
pub mod service;

pub use error::StartupError;
pub use gateway::{Gateway, ShutdownReport, StopOutcome};
pub use service::GenerateService;
