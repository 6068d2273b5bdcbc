//! `GenerateText` request and response, shared by both transports.
//!
//! The JSON form is what the HTTP front accepts and returns; the gRPC front
//! converts its protobuf messages to and from these.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Model identifier for this call. Absent or empty means "use the
    /// configured model".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The model to dispatch to, falling back to `default`.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.model.as_deref() {
            Some(model) if !model.is_empty() => model,
            _ => default,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    /// Echo of the request prompt.
    pub prompt: String,
    pub response: String,
}
