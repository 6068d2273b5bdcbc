//! Transport-neutral `GenerateText` handling shared by the gRPC and HTTP fronts.

use tracing::{debug, info};

use wrapper_core::{GatewayError, GenerateRequest, GenerateResponse, RequestContext};
use wrapper_providers::Dispatcher;

/// Validates requests, fills in the default model and hands off to the
/// dispatcher.
#[derive(Debug, Clone)]
pub struct GenerateService {
    dispatcher: Dispatcher,
    default_model: String,
}

impl GenerateService {
    pub fn new(dispatcher: Dispatcher, default_model: impl Into<String>) -> Self {
        Self {
            dispatcher,
            default_model: default_model.into(),
        }
    }

    /// Generate text for one prompt. The response echoes the prompt back.
    pub async fn generate_text(
        &self,
        ctx: &RequestContext,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, GatewayError> {
        if request.prompt.is_empty() {
            return Err(GatewayError::invalid_argument("prompt cannot be empty"));
        }

        let model = request.model_or(&self.default_model);
        info!(model, prompt_chars = request.prompt.len(), "GenerateText");

        let response = self
            .dispatcher
            .dispatch(ctx, model, &request.prompt)
            .await?;
        debug!(response_chars = response.len(), "GenerateText done");

        Ok(GenerateResponse {
            prompt: request.prompt,
            response,
        })
    }
}
