//! Provider registry: the closed set of supported LLM providers.
//!
//! A model identifier selects its provider by the token before the first
//! hyphen (`"gemini-2.0-flash"` → `gemini`). Matching is case-insensitive.
//! Adding a provider means adding a [`ProviderKind`] variant, which the
//! dispatcher's exhaustive `match` then forces a client for.

use wrapper_core::GatewayError;

// ─────────────────────────────────────────────
// ProviderKind / ProviderSpec
// ─────────────────────────────────────────────

/// Every provider the gateway can talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn spec(self) -> &'static ProviderSpec {
        match self {
            ProviderKind::Gemini => &GEMINI,
            ProviderKind::OpenAi => &OPENAI,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }
}

/// Static metadata for one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    /// Lowercase prefix tokens that select this provider.
    pub keys: &'static [&'static str],
    /// Human-readable name for logs and error messages.
    pub display_name: &'static str,
    /// API base URL used when config doesn't override it.
    pub default_api_base: &'static str,
}

const GEMINI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::Gemini,
    keys: &["gemini"],
    display_name: "Gemini",
    default_api_base: "https://generativelanguage.googleapis.com",
};

const OPENAI: ProviderSpec = ProviderSpec {
    kind: ProviderKind::OpenAi,
    keys: &["gpt", "o1", "openai"],
    display_name: "OpenAI",
    default_api_base: "https://api.openai.com/v1",
};

/// All supported providers, in matching order.
pub static PROVIDERS: &[ProviderSpec] = &[GEMINI, OPENAI];

// ─────────────────────────────────────────────
// Matching functions
// ─────────────────────────────────────────────

/// The provider key of a model identifier: everything before the first `-`.
pub fn provider_key(model: &str) -> &str {
    model.split('-').next().unwrap_or_default()
}

/// Find a provider by its key, ignoring ASCII case.
pub fn find_by_key(key: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS
        .iter()
        .find(|spec| spec.keys.iter().any(|k| k.eq_ignore_ascii_case(key)))
}

/// Model identifiers end up in provider URLs, so only plain name characters
/// are accepted.
fn is_valid_model_id(model: &str) -> bool {
    model
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

/// Resolve a full model identifier to its provider.
///
/// Fails with `InvalidArgument` when the identifier has no provider key,
/// contains characters outside `[A-Za-z0-9._-]`, or names a provider that
/// isn't in the registry.
pub fn resolve(model: &str) -> Result<&'static ProviderSpec, GatewayError> {
    let key = provider_key(model);
    if key.is_empty() || !is_valid_model_id(model) {
        return Err(GatewayError::invalid_argument(format!(
            "invalid model format: {model}"
        )));
    }

    find_by_key(key)
        .ok_or_else(|| GatewayError::invalid_argument(format!("unsupported model: {model}")))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_key() {
        assert_eq!(provider_key("gemini-2.0-flash"), "gemini");
        assert_eq!(provider_key("gpt-4o-mini"), "gpt");
        assert_eq!(provider_key("o1"), "o1");
        assert_eq!(provider_key(""), "");
        assert_eq!(provider_key("-flash"), "");
    }

    #[test]
    fn test_resolve_gemini() {
        assert_eq!(resolve("gemini-2.0-flash").unwrap().kind, ProviderKind::Gemini);
    }

    #[test]
    fn test_resolve_openai_prefixes() {
        for model in ["gpt-4", "gpt-4o-mini", "o1-preview", "o1", "openai-compat"] {
            assert_eq!(resolve(model).unwrap().kind, ProviderKind::OpenAi, "{model}");
        }
    }

    #[test]
    fn test_resolve_case_insensitive() {
        assert_eq!(resolve("Gemini-1.5-Pro").unwrap().kind, ProviderKind::Gemini);
        assert_eq!(resolve("GPT-4").unwrap().kind, ProviderKind::OpenAi);
        assert_eq!(resolve("O1-mini").unwrap().kind, ProviderKind::OpenAi);
    }

    #[test]
    fn test_resolve_prefix_must_be_whole_token() {
        // "gpt4" is not "gpt": the key is the whole first token
        assert!(resolve("gpt4-turbo").is_err());
        assert!(resolve("geminix-1").is_err());
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve("unknownvendor-x").unwrap_err();
        assert_eq!(
            err,
            GatewayError::InvalidArgument("unsupported model: unknownvendor-x".into())
        );
    }

    #[test]
    fn test_resolve_empty() {
        let err = resolve("").unwrap_err();
        assert_eq!(err, GatewayError::InvalidArgument("invalid model format: ".into()));

        let err = resolve("-2.0").unwrap_err();
        assert!(err.to_string().contains("invalid model format"));
    }

    #[test]
    fn test_resolve_rejects_path_characters() {
        for model in [
            "gemini-x/../../tunedModels?",
            "gemini-2.0-flash?key=x",
            "gemini-a b",
            "gpt-4#frag",
            "gemini-%2e%2e",
        ] {
            let err = resolve(model).unwrap_err();
            assert_eq!(
                err,
                GatewayError::InvalidArgument(format!("invalid model format: {model}")),
            );
        }
        assert!(resolve("gemini-1.5-pro_latest").is_ok());
    }

    #[test]
    fn test_spec_roundtrip() {
        for spec in PROVIDERS {
            assert_eq!(spec.kind.spec().display_name, spec.display_name);
        }
    }

    #[test]
    fn test_all_keys_are_lowercase_and_unique() {
        let mut keys: Vec<&str> = PROVIDERS.iter().flat_map(|s| s.keys.iter().copied()).collect();
        assert!(keys.iter().all(|k| *k == k.to_lowercase()));
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total, "Duplicate provider keys found");
    }
}
