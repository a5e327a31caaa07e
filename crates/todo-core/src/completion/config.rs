use std::env;
use std::fmt;
use std::time::Duration;

use super::types::DEFAULT_MODEL;

/// Connection settings for the chat-completion provider.
///
/// `Debug` output redacts the API key.
#[derive(Clone)]
pub struct LlmConfig {
    /// Bearer token. Only required once a completion is requested.
    pub api_key: Option<String>,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub const API_KEY_ENV: &str = "GROQ_API_KEY";
    pub const BASE_URL_ENV: &str = "TODO_LLM_BASE_URL";
    pub const MODEL_ENV: &str = "TODO_LLM_MODEL";

    /// Build a config from `GROQ_API_KEY`, `TODO_LLM_BASE_URL` and
    /// `TODO_LLM_MODEL`, defaulting whatever is unset.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(Self::API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            base_url: env::var(Self::BASE_URL_ENV)
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_owned()),
            model: env::var(Self::MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Endpoint for chat completions under `base_url`.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}
