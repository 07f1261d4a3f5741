//! Completion client with an ordered model fallback chain
//!
//! [`CompletionClient`] turns a prompt into analysis text. Each call walks the
//! configured candidates in order and moves on only when the provider reports
//! the model as unavailable. Any other failure ends the call immediately. No
//! path returns an error: failures come back as fixed sentinel strings or as
//! a formatted error string.

use crate::config::{ModelCandidates, ResearchConfig};
use crate::error::Result;
use crate::request::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use research_llm::providers::{PerplexityConfig, PerplexityProvider};
use research_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use research_prompt::PromptCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Returned when no API key is configured
pub const NOT_CONFIGURED: &str = "⚠️ API key not configured.";

/// Returned when every candidate reported its model as unavailable
pub const ALL_MODELS_FAILED: &str = "❌ All models failed.";

/// Prefix of the string returned for any other provider failure
pub const ERROR_PREFIX: &str = "❌ ";

/// How a completion call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// A candidate returned text
    Succeeded,
    /// No credential; nothing was sent
    NotConfigured,
    /// Every candidate was unavailable
    Exhausted,
    /// A non-recoverable provider error stopped the chain
    Failed,
}

/// Detailed result of one completion call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Analysis text or a diagnostic string; never empty
    pub text: String,
    pub outcome: CompletionOutcome,
    /// Candidate that produced `text`, on success
    pub model_used: Option<String>,
}

impl Completion {
    pub fn succeeded(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outcome: CompletionOutcome::Succeeded,
            model_used: Some(model.into()),
        }
    }

    pub fn not_configured() -> Self {
        Self::sentinel(NOT_CONFIGURED, CompletionOutcome::NotConfigured)
    }

    pub fn exhausted() -> Self {
        Self::sentinel(ALL_MODELS_FAILED, CompletionOutcome::Exhausted)
    }

    pub fn failed(error: &LLMError) -> Self {
        Self::sentinel(format!("{ERROR_PREFIX}{error}"), CompletionOutcome::Failed)
    }

    fn sentinel(text: impl Into<String>, outcome: CompletionOutcome) -> Self {
        Self {
            text: text.into(),
            outcome,
            model_used: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == CompletionOutcome::Succeeded
    }
}

/// Anything that turns a prompt into a [`Completion`]
///
/// Implemented by [`CompletionClient`] and by decorators such as
/// [`crate::CachedCompleter`]. Implementations must be total.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Complete a prompt, reporting how the call ended
    async fn complete_detailed(&self, prompt: &str) -> Completion;

    /// Complete a prompt, returning only the text
    async fn complete(&self, prompt: &str) -> String {
        self.complete_detailed(prompt).await.text
    }

    /// Render and complete one section request
    async fn analyze(&self, request: &AnalysisRequest, catalog: &PromptCatalog) -> AnalysisResult {
        let prompt = request.prompt(catalog);
        let completion = self.complete_detailed(&prompt).await;
        AnalysisResult::from_completion(request.section(), completion)
    }
}

/// Request parameters shared by every completion call
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub candidates: ModelCandidates,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl From<&ResearchConfig> for CompletionSettings {
    fn from(config: &ResearchConfig) -> Self {
        Self {
            candidates: config.candidates.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from(&ResearchConfig::default())
    }
}

/// Chat-completion client with bounded model fallback
///
/// The transport is resolved once, at construction. Without a credential the
/// client stays unconfigured for its whole lifetime and every call returns
/// [`NOT_CONFIGURED`] without touching the network.
///
/// # Example
///
/// ```no_run
/// use research_core::{Completer, CompletionClient, ResearchConfig};
///
/// # async fn example() -> research_core::Result<()> {
/// let client = CompletionClient::from_config(ResearchConfig::from_env()?)?;
/// let text = client.complete("Bull, base and bear cases for TCS").await;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CompletionClient {
    provider: Option<Arc<dyn LLMProvider>>,
    settings: Arc<CompletionSettings>,
}

impl CompletionClient {
    /// Build a client from configuration
    ///
    /// A missing API key is not an error; it yields an unconfigured client.
    pub fn from_config(config: ResearchConfig) -> Result<Self> {
        config.validate()?;
        let settings = CompletionSettings::from(&config);

        let Some(api_key) = config.api_key else {
            info!("No API key configured, completions will return the not-configured notice");
            return Ok(Self::unconfigured(settings));
        };

        let provider = PerplexityProvider::with_config(
            PerplexityConfig::new(api_key)
                .with_api_base(config.api_base)
                .with_timeout(config.request_timeout.as_secs().max(1)),
        )?;

        info!(
            candidates = settings.candidates.len(),
            primary = settings.candidates.primary().unwrap_or_default(),
            "Completion client ready"
        );
        Ok(Self::with_provider(Arc::new(provider), settings))
    }

    /// Build a client around an existing transport
    pub fn with_provider(provider: Arc<dyn LLMProvider>, settings: CompletionSettings) -> Self {
        Self {
            provider: Some(provider),
            settings: Arc::new(settings),
        }
    }

    /// Build a client that has no credential
    pub fn unconfigured(settings: CompletionSettings) -> Self {
        Self {
            provider: None,
            settings: Arc::new(settings),
        }
    }

    /// Whether a transport is available
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    fn request_for(&self, model: &str, prompt: &str) -> CompletionRequest {
        CompletionRequest::builder(model)
            .system(self.settings.system_prompt.as_str())
            .add_message(Message::user(prompt))
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .build()
    }
}

#[async_trait]
impl Completer for CompletionClient {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn complete_detailed(&self, prompt: &str) -> Completion {
        let Some(provider) = &self.provider else {
            return Completion::not_configured();
        };

        for model in self.settings.candidates.iter() {
            debug!(model, "Requesting completion");

            match provider.complete(self.request_for(model, prompt)).await {
                Ok(response) if response.text.trim().is_empty() => {
                    let error = LLMError::UnexpectedResponse("empty completion text".to_string());
                    warn!(model, "Provider returned empty text");
                    return Completion::failed(&error);
                }
                Ok(response) => {
                    debug!(model, chars = response.text.len(), "Completion succeeded");
                    return Completion::succeeded(response.text, model);
                }
                Err(e) if e.is_model_unavailable() => {
                    warn!(model, error = %e, "Model unavailable, trying next candidate");
                }
                Err(e) => {
                    warn!(model, error = %e, "Completion failed");
                    return Completion::failed(&e);
                }
            }
        }

        warn!("Every model candidate was unavailable");
        Completion::exhausted()
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mockall::mock;
    use research_llm::CompletionResponse;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted outcome for one model
    #[derive(Clone)]
    pub(crate) enum Reply {
        Text(&'static str),
        Unavailable,
        Unauthorized,
    }

    /// Provider that answers per model and records every model it was asked for
    pub(crate) struct ScriptedProvider {
        replies: HashMap<&'static str, Reply>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(replies: &[(&'static str, Reply)]) -> Self {
            Self {
                replies: replies.iter().cloned().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> research_llm::Result<CompletionResponse> {
            self.calls.lock().unwrap().push(request.model.clone());
            match self.replies.get(request.model.as_str()) {
                Some(Reply::Text(text)) => {
                    let prompt = request.prompt().unwrap_or_default();
                    Ok(CompletionResponse::new(format!("{text} [{prompt}]"), request.model))
                }
                Some(Reply::Unauthorized) => Err(LLMError::AuthenticationFailed(
                    "Invalid API key provided: pplx-****abcd".to_string(),
                )),
                Some(Reply::Unavailable) | None => Err(LLMError::ModelUnavailable {
                    model: request.model,
                    detail: "invalid_model".to_string(),
                }),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    mock! {
        pub Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> research_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    pub(crate) fn settings() -> CompletionSettings {
        CompletionSettings::default()
    }

    fn client(provider: Arc<dyn LLMProvider>) -> CompletionClient {
        CompletionClient::with_provider(provider, settings())
    }

    #[tokio::test]
    async fn test_unconfigured_returns_sentinel() {
        let client = CompletionClient::unconfigured(settings());
        assert!(!client.is_configured());

        for prompt in ["", "Valuation for TCS", "💥"] {
            assert_eq!(client.complete(prompt).await, NOT_CONFIGURED);
        }

        let completion = client.complete_detailed("anything").await;
        assert_eq!(completion.outcome, CompletionOutcome::NotConfigured);
        assert!(completion.model_used.is_none());
    }

    #[tokio::test]
    async fn test_from_config_without_key_is_unconfigured() {
        let client = CompletionClient::from_config(ResearchConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert_eq!(client.complete("Cash flow for INFY").await, NOT_CONFIGURED);
    }

    #[test]
    fn test_from_config_with_key_is_configured() {
        let config = ResearchConfig::builder().api_key("pplx-test").build().unwrap();
        let client = CompletionClient::from_config(config).unwrap();
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn test_first_candidate_success() {
        let provider = Arc::new(ScriptedProvider::new(&[("sonar-pro", Reply::Text("pro answer"))]));
        let completion = client(provider.clone()).complete_detailed("Valuation for TCS").await;

        assert!(completion.is_success());
        assert_eq!(completion.text, "pro answer [Valuation for TCS]");
        assert_eq!(completion.model_used.as_deref(), Some("sonar-pro"));
        assert_eq!(provider.calls(), vec!["sonar-pro"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_third_candidate() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("sonar-pro", Reply::Unavailable),
            ("sonar", Reply::Unavailable),
            ("sonar-reasoning", Reply::Text("reasoned")),
        ]));
        let completion = client(provider.clone()).complete_detailed("Growth triggers").await;

        assert_eq!(completion.outcome, CompletionOutcome::Succeeded);
        assert_eq!(completion.text, "reasoned [Growth triggers]");
        assert_eq!(completion.model_used.as_deref(), Some("sonar-reasoning"));
        assert_eq!(provider.calls(), vec!["sonar-pro", "sonar", "sonar-reasoning"]);
    }

    #[tokio::test]
    async fn test_all_candidates_unavailable() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let client = client(provider.clone());

        assert_eq!(client.complete("Scenario analysis").await, ALL_MODELS_FAILED);
        assert_eq!(provider.calls().len(), 3);

        let completion = client.complete_detailed("Scenario analysis").await;
        assert_eq!(completion.outcome, CompletionOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_other_error_stops_chain() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("sonar-pro", Reply::Unauthorized),
            ("sonar", Reply::Text("never reached")),
        ]));
        let completion = client(provider.clone()).complete_detailed("Balance sheet").await;

        assert_eq!(completion.outcome, CompletionOutcome::Failed);
        assert!(completion.text.starts_with(ERROR_PREFIX));
        assert_eq!(
            completion.text,
            "❌ Authentication failed: Invalid API key provided: pplx-****abcd"
        );
        assert_eq!(provider.calls(), vec!["sonar-pro"]);
    }

    #[tokio::test]
    async fn test_other_error_after_fallback() {
        let provider = Arc::new(ScriptedProvider::new(&[
            ("sonar-pro", Reply::Unavailable),
            ("sonar", Reply::Unauthorized),
            ("sonar-reasoning", Reply::Text("never reached")),
        ]));
        let completion = client(provider.clone()).complete_detailed("Cash flow").await;

        assert_eq!(completion.outcome, CompletionOutcome::Failed);
        assert_eq!(provider.calls(), vec!["sonar-pro", "sonar"]);
    }

    #[tokio::test]
    async fn test_identical_prompts_identical_output() {
        let provider = Arc::new(ScriptedProvider::new(&[("sonar-pro", Reply::Text("steady"))]));
        let client = client(provider);

        let first = client.complete("Ratio analysis for HDFCBANK").await;
        let second = client.complete("Ratio analysis for HDFCBANK").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_prompt_never_panics() {
        let provider = Arc::new(ScriptedProvider::new(&[("sonar-pro", Reply::Text("ok"))]));
        let text = client(provider).complete("").await;
        assert!(!text.is_empty());
    }

    #[tokio::test]
    async fn test_request_shape() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(1)
            .withf(|request| {
                request.model == "sonar-pro"
                    && request.system.as_deref()
                        == Some("You are an equity research analyst. Provide detailed data-driven analysis.")
                    && request.prompt() == Some("Annual report red flags")
                    && request.max_tokens == 2000
                    && request.temperature == Some(0.1)
            })
            .returning(|request| Ok(CompletionResponse::new("clean audit", request.model)));

        let text = client(Arc::new(provider)).complete("Annual report red flags").await;
        assert_eq!(text, "clean audit");
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Err(LLMError::RateLimitExceeded("slow down".to_string())));

        let completion = client(Arc::new(provider)).complete_detailed("News for TCS").await;
        assert_eq!(completion.outcome, CompletionOutcome::Failed);
        assert_eq!(completion.text, "❌ Rate limit exceeded: slow down");
    }

    #[tokio::test]
    async fn test_empty_response_text_is_failure() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(|request| Ok(CompletionResponse::new("  ", request.model)));

        let completion = client(Arc::new(provider)).complete_detailed("Cash flow").await;
        assert_eq!(completion.outcome, CompletionOutcome::Failed);
        assert!(!completion.text.trim().is_empty());
    }

    /// Serve one canned HTTP response per connection, chosen by requested model
    async fn serve_chat(routes: &'static [(&'static str, &'static str, &'static str)]) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 4096];
                    let request = loop {
                        let n = socket.read(&mut chunk).await.unwrap();
                        buf.extend_from_slice(&chunk[..n]);
                        let text = String::from_utf8_lossy(&buf).into_owned();
                        let complete = text.find("\r\n\r\n").is_some_and(|end| {
                            let length = text[..end]
                                .lines()
                                .filter_map(|line| line.split_once(':'))
                                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                                .unwrap_or(0);
                            buf.len() >= end + 4 + length
                        });
                        if n == 0 || complete {
                            break text;
                        }
                    };

                    let (status, body) = routes
                        .iter()
                        .find(|(model, _, _)| request.contains(&format!(r#""model":"{model}""#)))
                        .map_or(("404 Not Found", "not found"), |(_, status, body)| (*status, *body));
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}")
    }

    fn http_client(base: String) -> CompletionClient {
        let provider = PerplexityProvider::with_config(
            PerplexityConfig::new("pplx-local").with_api_base(base).without_proxy(),
        )
        .unwrap();
        client(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_falls_back_over_http() {
        static ROUTES: &[(&str, &str, &str)] = &[
            (
                "sonar-pro",
                "400 Bad Request",
                r#"{"error":{"message":"Invalid model 'sonar-pro'","type":"invalid_model","code":400}}"#,
            ),
            (
                "sonar",
                "200 OK",
                r#"{"model":"sonar","choices":[{"message":{"role":"assistant","content":"Margins expanded 120bps."}}]}"#,
            ),
        ];
        let client = http_client(serve_chat(ROUTES).await);

        let completion = client.complete_detailed("P&L analysis for TCS").await;
        assert_eq!(completion.outcome, CompletionOutcome::Succeeded);
        assert_eq!(completion.text, "Margins expanded 120bps.");
        assert_eq!(completion.model_used.as_deref(), Some("sonar"));
    }

    #[tokio::test]
    async fn test_plain_not_found_over_http_stops_chain() {
        static ROUTES: &[(&str, &str, &str)] = &[(
            "sonar",
            "200 OK",
            r#"{"choices":[{"message":{"content":"never reached"}}]}"#,
        )];
        let client = http_client(serve_chat(ROUTES).await);

        // sonar-pro has no route, so the server answers a bare 404
        let completion = client.complete_detailed("Cash flow for INFY").await;
        assert_eq!(completion.outcome, CompletionOutcome::Failed);
        assert_eq!(completion.text, "❌ Invalid request: not found");
    }

    #[tokio::test]
    async fn test_custom_candidates_order() {
        let provider = Arc::new(ScriptedProvider::new(&[("sonar", Reply::Text("plain"))]));
        let settings = CompletionSettings {
            candidates: ModelCandidates::new(["sonar-deep-research", "sonar"]).unwrap(),
            ..settings()
        };
        let client = CompletionClient::with_provider(provider.clone(), settings);

        let completion = client.complete_detailed("Presentations").await;
        assert_eq!(completion.model_used.as_deref(), Some("sonar"));
        assert_eq!(provider.calls(), vec!["sonar-deep-research", "sonar"]);
    }
}
