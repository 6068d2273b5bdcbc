//! The provider trait every LLM backend implements.

use async_trait::async_trait;

/// A vendor that turns one prompt into one block of text.
///
/// Implementations make exactly one upstream call per invocation: no retries,
/// no fallback. Cancellation is the caller's job; dropping the returned
/// future must abandon the request.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Run a single-turn completion.
    ///
    /// # Arguments
    /// * `model`:  Full model identifier (e.g. `"gemini-2.0-flash"`), not just the prefix.
    /// * `prompt`: The user prompt, passed through unchanged.
    ///
    /// # Returns
    /// The generated text. An empty string is a valid return here; the
    /// dispatcher decides what an empty answer means.
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<String>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
