//! Perplexity provider implementation
//!
//! Perplexity exposes an OpenAI-compatible chat-completions endpoint, so this
//! provider also works against any other service with the same wire shape.
//! See: https://docs.perplexity.ai/api-reference/chat-completions
//!
//! # Example
//!
//! ```no_run
//! use research_llm::{CompletionRequest, LLMProvider, Message};
//! use research_llm::providers::{PerplexityConfig, PerplexityProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PerplexityConfig::new("pplx-...").with_timeout(60);
//!     let provider = PerplexityProvider::with_config(config)?;
//!
//!     let request = CompletionRequest::builder("sonar-pro")
//!         .system("You are an equity research analyst.")
//!         .add_message(Message::user("Valuation for TCS"))
//!         .max_tokens(2000)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

use crate::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default Perplexity API base URL
pub const DEFAULT_API_BASE: &str = "https://api.perplexity.ai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider error codes that mean the requested model cannot be served
const MODEL_UNAVAILABLE_CODES: &[&str] = &["invalid_model", "model_not_found"];

/// Configuration for the Perplexity provider
#[derive(Debug, Clone)]
pub struct PerplexityConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.perplexity.ai")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment (default: true)
    pub use_system_proxy: bool,
}

impl PerplexityConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_system_proxy: true,
        }
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Connect directly, ignoring proxy environment variables
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Chat-completion provider for Perplexity's Sonar models
pub struct PerplexityProvider {
    client: Client,
    config: PerplexityConfig,
}

impl PerplexityProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: PerplexityConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError("API key must not be empty".to_string()));
        }

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(PerplexityConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &PerplexityConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for PerplexityProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending chat completion request");

        let model = request.model.clone();
        let body = ChatRequest::from(request);

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &model, &text));
        }

        let parsed = parse_response(&text, &model)?;
        debug!(
            finish_reason = parsed.finish_reason.as_deref().unwrap_or("unknown"),
            tokens = parsed.usage.map(|u| u.total()),
            "Received chat completion"
        );
        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "perplexity"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl From<CompletionRequest> for ChatRequest {
    fn from(request: CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system {
            messages.push(Message::system(system));
        }
        messages.extend(request.messages);

        Self {
            model: request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ErrorBody {
    fn names_unavailable_model(&self) -> bool {
        let code = self.code.as_ref().and_then(serde_json::Value::as_str);
        [self.kind.as_deref(), code]
            .into_iter()
            .flatten()
            .any(|c| MODEL_UNAVAILABLE_CODES.contains(&c.to_ascii_lowercase().as_str()))
    }
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Turn a successful response body into a [`CompletionResponse`]
///
/// The single choice must carry non-blank content.
fn parse_response(body: &str, requested_model: &str) -> Result<CompletionResponse> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let text = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| LLMError::UnexpectedResponse("Empty message content".to_string()))?;

    Ok(CompletionResponse {
        text,
        model: response.model.unwrap_or_else(|| requested_model.to_string()),
        finish_reason: choice.finish_reason,
        usage: response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

/// Map a non-success HTTP status and body to a classified error
fn classify_error(status: u16, model: &str, body: &str) -> LLMError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let detail = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| body.trim().to_string());

    if parsed.as_ref().is_some_and(ErrorBody::names_unavailable_model) {
        return LLMError::ModelUnavailable {
            model: model.to_string(),
            detail,
        };
    }

    match status {
        401 | 403 => LLMError::AuthenticationFailed(detail),
        429 => LLMError::RateLimitExceeded(detail),
        400..=499 => LLMError::InvalidRequest(detail),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {detail}")),
    }
}

// ============================================================================
// Tests
// ============================================================================
