//! LLM provider layer for Wrapper.
//!
//! # Architecture
//!
//! - [`traits::TextProvider`]: single-turn text completion, one impl per vendor
//! - [`registry`]: the closed set of providers and model-prefix matching
//! - [`gemini::GeminiProvider`], [`openai::OpenAiProvider`]: `reqwest` clients
//! - [`dispatcher::Dispatcher`]: model → provider selection, cancellation, error mapping

mod client;
pub mod dispatcher;
pub mod gemini;
pub mod openai;
pub mod registry;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use registry::{ProviderKind, ProviderSpec, PROVIDERS};
pub use traits::TextProvider;
