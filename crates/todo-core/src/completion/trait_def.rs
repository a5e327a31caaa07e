//! The `CompletionGateway` trait -- the adapter interface for LLM providers.

use anyhow::Result;
use async_trait::async_trait;

use super::types::CompletionRequest;

/// Sends one chat-completion request and returns the first choice's text.
///
/// `Ok(None)` means the provider answered but the first choice carried no
/// content. Transport, auth and decoding failures are errors; implementors
/// must not retry.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Human-readable provider name (e.g. "groq").
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn CompletionGateway) {}
};
