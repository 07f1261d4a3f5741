//! Configuration for research runs

use crate::error::{ResearchError, Result};
use research_llm::providers::perplexity::DEFAULT_API_BASE;
use research_utils::parse_env_value;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "PPLX_API_KEY";
/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "PPLX_API_BASE";
/// Environment variable overriding the candidate list (comma separated)
pub const MODELS_ENV: &str = "PPLX_MODELS";
/// Environment variable overriding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "RESEARCH_TIMEOUT_SECS";
/// Environment variable overriding the cache TTL in seconds
pub const CACHE_TTL_ENV: &str = "RESEARCH_CACHE_TTL_SECS";

const DEFAULT_MODELS: [&str; 3] = ["sonar-pro", "sonar", "sonar-reasoning"];
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an equity research analyst. Provide detailed data-driven analysis.";

/// Ordered, non-empty list of model identifiers to attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCandidates(Vec<String>);

impl ModelCandidates {
    /// Build a candidate list, dropping blank entries
    pub fn new<I, S>(models: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models: Vec<String> = models
            .into_iter()
            .map(|m| m.into().trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if models.is_empty() {
            return Err(ResearchError::ConfigError(
                "model candidate list must not be empty".to_string(),
            ));
        }
        Ok(Self(models))
    }

    /// Parse a comma-separated list such as `sonar-pro,sonar`
    pub fn parse(list: &str) -> Result<Self> {
        Self::new(list.split(','))
    }

    /// Iterate candidates in attempt order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty (only possible through deserialization)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First candidate, the preferred model
    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl Default for ModelCandidates {
    fn default() -> Self {
        Self(DEFAULT_MODELS.iter().map(ToString::to_string).collect())
    }
}

/// Configuration for research runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Chat-completions API base URL
    pub api_base: String,

    /// API key; `None` leaves the completion client unconfigured
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Models to attempt, in order
    pub candidates: ModelCandidates,

    /// System instruction sent with every prompt
    pub system_prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per completion
    pub max_tokens: usize,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Lifetime of cached completions
    pub cache_ttl: Duration,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            candidates: ModelCandidates::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            request_timeout: Duration::from_secs(120),
            cache_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl ResearchConfig {
    /// Create a new configuration builder
    pub fn builder() -> ResearchConfigBuilder {
        ResearchConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Whether an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(ResearchError::ConfigError(
                "model candidate list must not be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ResearchError::ConfigError(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ResearchError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ResearchError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.api_base.trim().is_empty() {
            return Err(ResearchError::ConfigError("api_base must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for ResearchConfig
#[derive(Debug, Default)]
pub struct ResearchConfigBuilder {
    api_base: Option<String>,
    api_key: Option<String>,
    candidates: Option<Vec<String>>,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    request_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
}

impl ResearchConfigBuilder {
    /// Set the API base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the API key; blank keys are treated as absent
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then(|| key.trim().to_string());
        self
    }

    /// Set the model candidates
    pub fn candidates<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = Some(models.into_iter().map(Into::into).collect());
        self
    }

    /// Set the system instruction
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Load settings from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(research_utils::env_var)
    }

    /// Load settings through a custom lookup
    ///
    /// Only keys the lookup returns a value for are applied; the lookup is
    /// expected to report blank values as `None`.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self = self.api_key(key);
        }
        if let Some(base) = lookup(API_BASE_ENV) {
            self.api_base = Some(base);
        }
        if let Some(models) = lookup(MODELS_ENV) {
            self.candidates = Some(models.split(',').map(ToString::to_string).collect());
        }
        if let Some(secs) = lookup(TIMEOUT_ENV).and_then(|s| parse_env_value(TIMEOUT_ENV, &s)) {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = lookup(CACHE_TTL_ENV).and_then(|s| parse_env_value(CACHE_TTL_ENV, &s)) {
            self.cache_ttl = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ResearchConfig> {
        let defaults = ResearchConfig::default();

        let candidates = match self.candidates {
            Some(models) => ModelCandidates::new(models)?,
            None => defaults.candidates,
        };

        let config = ResearchConfig {
            api_base: self.api_base.unwrap_or(defaults.api_base),
            api_key: self.api_key,
            candidates,
            system_prompt: self.system_prompt.unwrap_or(defaults.system_prompt),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ResearchConfig::default();
        assert_eq!(config.api_base, "https://api.perplexity.ai");
        assert_eq!(
            config.candidates.iter().collect::<Vec<_>>(),
            vec!["sonar-pro", "sonar", "sonar-reasoning"]
        );
        assert_eq!(config.max_tokens, 2000);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ResearchConfig::builder()
            .api_key("pplx-test")
            .candidates(["sonar"])
            .max_tokens(512)
            .request_timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("pplx-test"));
        assert_eq!(config.candidates.len(), 1);
        assert_eq!(config.candidates.primary(), Some("sonar"));
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = ResearchConfig::builder().api_key("   ").build().unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_empty_candidates_rejected() {
        assert!(ResearchConfig::builder().candidates(Vec::<String>::new()).build().is_err());
        assert!(ResearchConfig::builder().candidates([" ", ""]).build().is_err());
        assert!(ModelCandidates::parse(" , ,").is_err());
    }

    #[test]
    fn test_temperature_range() {
        assert!(ResearchConfig::builder().temperature(2.5).build().is_err());
        assert!(ResearchConfig::builder().temperature(-0.1).build().is_err());
        assert!(ResearchConfig::builder().temperature(0.0).build().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(ResearchConfig::builder().max_tokens(0).build().is_err());
        assert!(ResearchConfig::builder().request_timeout(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_with_env_from() {
        let config = ResearchConfig::builder()
            .with_env_from(lookup(&[
                (API_KEY_ENV, "pplx-env"),
                (API_BASE_ENV, "http://localhost:9000"),
                (MODELS_ENV, "sonar, sonar-pro ,"),
                (TIMEOUT_ENV, "45"),
                (CACHE_TTL_ENV, "not-a-number"),
            ]))
            .build()
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("pplx-env"));
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.candidates.iter().collect::<Vec<_>>(), vec!["sonar", "sonar-pro"]);
        assert_eq!(config.request_timeout, Duration::from_secs(45));
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_with_env_from_empty() {
        let config = ResearchConfig::builder().with_env_from(lookup(&[])).build().unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.candidates, ModelCandidates::default());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = ResearchConfig::builder().api_key("secret").build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("sonar-pro"));
    }
}
