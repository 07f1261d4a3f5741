//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for chat-completion providers
///
/// One call is one outbound request against one model. Implementations must
/// report a rejected model identifier as [`crate::LLMError::ModelUnavailable`]
/// so callers can move on to the next candidate; every other failure uses the
/// remaining variants.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for `request.model`
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "perplexity")
    fn name(&self) -> &str;
}
