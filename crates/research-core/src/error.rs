//! Error types for research orchestration

use research_llm::LLMError;
use research_prompt::PromptError;
use thiserror::Error;

/// Errors raised while setting up or starting a research run
///
/// Completion failures never appear here; they are folded into the returned
/// text by [`crate::CompletionClient`].
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Ticker was empty after trimming
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Transport could not be constructed
    #[error("Provider error: {0}")]
    Provider(#[from] LLMError),

    /// Prompt catalog error
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),
}

/// Result type alias for research operations
pub type Result<T> = std::result::Result<T, ResearchError>;
