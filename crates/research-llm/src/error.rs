//! Classified transport errors

use thiserror::Error;

/// Result type for provider calls
pub type Result<T> = std::result::Result<T, LLMError>;

/// Why a provider call failed
///
/// Only [`LLMError::ModelUnavailable`] is recoverable by switching models.
#[derive(Error, Debug)]
pub enum LLMError {
    /// The provider rejected or does not serve the requested model
    #[error("Model unavailable: {model}: {detail}")]
    ModelUnavailable { model: String, detail: String },

    /// HTTP 401 or 403
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// HTTP 429
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Any other 4xx
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 5xx and anything unclassified
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Connection, TLS or timeout failure
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response did not match the chat-completion contract
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether this failure should advance to the next model candidate
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, LLMError::ModelUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = LLMError::ModelUnavailable {
            model: "sonar-pro".to_string(),
            detail: "retired".to_string(),
        };
        assert!(err.is_model_unavailable());
        assert_eq!(err.to_string(), "Model unavailable: sonar-pro: retired");

        assert!(!LLMError::AuthenticationFailed("bad key".to_string()).is_model_unavailable());
        assert!(!LLMError::RateLimitExceeded("slow down".to_string()).is_model_unavailable());
        assert!(!LLMError::UnexpectedResponse("no choices".to_string()).is_model_unavailable());
    }
}
