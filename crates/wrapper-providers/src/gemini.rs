//! Gemini provider over the Generative Language REST API.
//!
//! `POST {base}/v1beta/models/{model}:generateContent`, key in the
//! `x-goog-api-key` header.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{build_http_client, ensure_success};
use crate::registry::ProviderKind;
use crate::traits::TextProvider;

pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a client. `api_base` falls back to the public endpoint.
    pub fn new(api_key: &str, api_base: Option<&str>) -> anyhow::Result<Self> {
        let api_base = api_base
            .unwrap_or(ProviderKind::Gemini.spec().default_api_base)
            .to_string();

        Ok(Self {
            client: build_http_client()?,
            api_base,
            api_key: api_key.to_string(),
        })
    }

    /// `{base}/v1beta/models/{model}:generateContent`, with the model added
    /// as one escaped path segment.
    fn generate_url(&self, model: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("invalid Gemini API base: {}", self.api_base))?;
        let method = format!("{model}:generateContent");
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Gemini API base cannot hold a path: {}", self.api_base))?
            .pop_if_empty()
            .push("v1beta")
            .push("models")
            .push(&method);
        Ok(url)
    }
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        debug!(provider = "Gemini", model, "Calling LLM");

        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url(model)?)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(self.display_name(), response).await?;

        let parsed: GenerateContentResponse = response.json().await?;
        let block_reason = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref());
        if let (true, Some(reason)) = (parsed.candidates.is_empty(), block_reason) {
            anyhow::bail!("prompt blocked: {reason}");
        }

        let text = parsed.text();
        debug!(provider = "Gemini", chars = text.len(), "LLM response received");
        Ok(text)
    }

    fn display_name(&self) -> &str {
        ProviderKind::Gemini.display_name()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
