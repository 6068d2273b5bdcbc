//! OpenAI provider over the `/chat/completions` endpoint.
//!
//! The prompt goes out as a single user message; the first choice's content
//! comes back.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{build_http_client, ensure_success};
use crate::registry::ProviderKind;
use crate::traits::TextProvider;

/// OpenAI chat completions client, authenticated with a bearer key.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(api_key: &str, api_base: Option<&str>) -> anyhow::Result<Self> {
        let api_base = api_base
            .unwrap_or(ProviderKind::OpenAi.spec().default_api_base)
            .to_string();

        Ok(Self {
            client: build_http_client()?,
            api_base,
            api_key: api_key.to_string(),
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        debug!(provider = "OpenAI", model, "Calling LLM");

        let body = ChatCompletionRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(self.display_name(), response).await?;

        let parsed: ChatCompletionResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .context("no choices in response")?;

        let text = choice.message.content.unwrap_or_default();
        debug!(provider = "OpenAI", chars = text.len(), "LLM response received");
        Ok(text)
    }

    fn display_name(&self) -> &str {
        ProviderKind::OpenAi.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_completions_url_trailing_slash() {
        let provider = OpenAiProvider::new("key", Some("https://api.openai.com/v1/")).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base() {
        let provider = OpenAiProvider::new("key", None).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "messages": [{ "role": "user", "content": "Hello" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "Hi" },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::new("test-key-123", Some(&mock_server.uri())).unwrap();
        let text = provider.complete("gpt-4", "Hello").await.unwrap();
        assert_eq!(text, "Hi");
    }

    #[tokio::test]
    async fn test_complete_null_content_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": null }, "finish_reason": "stop" }]
            })))
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::new("key", Some(&mock_server.uri())).unwrap();
        let text = provider.complete("gpt-4", "Hello").await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_complete_no_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::new("key", Some(&mock_server.uri())).unwrap();
        let err = provider.complete("gpt-4", "Hello").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(serde_json::json!({
                    "error": {
                        "message": "Rate limit exceeded",
                        "type": "rate_limit_error"
                    }
                })),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::new("key", Some(&mock_server.uri())).unwrap();
        let err = provider.complete("gpt-4", "Hello").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        let provider = OpenAiProvider::new("key", Some("http://127.0.0.1:1")).unwrap();
        assert!(provider.complete("gpt-4", "Hello").await.is_err());
    }
}
