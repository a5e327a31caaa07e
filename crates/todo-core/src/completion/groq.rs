//! Groq chat-completion client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire format, so any
//! provider exposing that endpoint can be targeted through `base_url`.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::LlmConfig;
use super::trait_def::CompletionGateway;
use super::types::{ChatMessage, CompletionRequest};

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
    temperature: f32,
    max_completion_tokens: u32,
    top_p: f32,
    stream: bool,
    stop: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// [`CompletionGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    config: LlmConfig,
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionGateway for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "no LLM API key configured; set {} or llm.api_key in the config file",
                LlmConfig::API_KEY_ENV
            )
        })?;

        let body = ChatCompletionBody {
            messages: &request.messages,
            model: &request.model,
            temperature: request.temperature,
            max_completion_tokens: request.max_completion_tokens,
            top_p: request.top_p,
            stream: false,
            stop: None,
        };

        let url = self.config.completions_url();
        debug!(%url, model = %request.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("chat completion request to {url} failed"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read chat completion response")?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&text) {
                bail!("chat completion API error ({status}): {}", err.error.message);
            }
            bail!("chat completion API error ({status}): {text}");
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).context("failed to parse chat completion response")?;

        let first = parsed
            .choices
            .into_iter()
            .next()
            .context("chat completion response contained no choices")?;

        Ok(first.message.content)
    }
}
