//! Dispatcher: picks the provider for a model and normalizes the outcome.
//!
//! One call is one attempt against one provider. The request context races
//! the provider call, so a caller that gives up (or a shutdown past its grace
//! period) abandons the upstream request instead of waiting on it.

use std::sync::Arc;

use tracing::{debug, error, warn};

use wrapper_core::config::ProviderConfig;
use wrapper_core::{GatewayError, RequestContext};

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;
use crate::registry::{self, ProviderKind};
use crate::traits::TextProvider;

/// Routes prompts to the provider their model identifier names.
#[derive(Clone)]
pub struct Dispatcher {
    gemini: Arc<dyn TextProvider>,
    openai: Arc<dyn TextProvider>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("gemini", &self.gemini.display_name())
            .field("openai", &self.openai.display_name())
            .finish()
    }
}

impl Dispatcher {
    /// Wire one client per provider kind.
    pub fn new(gemini: Arc<dyn TextProvider>, openai: Arc<dyn TextProvider>) -> Self {
        Self { gemini, openai }
    }

    /// Build the real HTTP clients from config. Every client shares the
    /// configured API key.
    pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Self> {
        let gemini = GeminiProvider::new(&config.api_key, config.gemini_api_base.as_deref())?;
        let openai = OpenAiProvider::new(&config.api_key, config.openai_api_base.as_deref())?;
        Ok(Self::new(Arc::new(gemini), Arc::new(openai)))
    }

    fn provider(&self, kind: ProviderKind) -> &dyn TextProvider {
        match kind {
            ProviderKind::Gemini => self.gemini.as_ref(),
            ProviderKind::OpenAi => self.openai.as_ref(),
        }
    }

    /// Send `prompt` to the provider selected by `model`.
    ///
    /// # Errors
    /// - `InvalidArgument`: the model has no provider key or an unknown one.
    ///   Returned before any provider is contacted.
    /// - `Canceled` / `DeadlineExceeded`: the context ended before or during
    ///   the call.
    /// - `EmptyResponse`: the provider succeeded with no text.
    /// - `Provider`: the provider call failed for any other reason.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        model: &str,
        prompt: &str,
    ) -> Result<String, GatewayError> {
        let spec = registry::resolve(model).inspect_err(|_| {
            warn!(model, "Unsupported model");
        })?;
        let provider = self.provider(spec.kind);

        debug!(provider = spec.display_name, model, "Dispatching prompt");

        match ctx.run(provider.complete(model, prompt)).await {
            Err(cancelled) => {
                warn!(provider = spec.display_name, model, error = %cancelled, "Provider call abandoned");
                Err(cancelled)
            }
            Ok(Ok(text)) if text.is_empty() => {
                warn!(provider = spec.display_name, model, "Provider returned empty response");
                Err(GatewayError::EmptyResponse {
                    provider: spec.display_name,
                })
            }
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                error!(provider = spec.display_name, model, error = %e, "Generation failed");
                // A provider error caused by the caller giving up is reported as such.
                if let Some(cancelled) = ctx.err() {
                    return Err(cancelled);
                }
                Err(GatewayError::Provider {
                    provider: spec.display_name,
                    detail: format!("{e:#}"),
                })
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
