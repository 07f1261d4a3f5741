//! Chat-completion transport for the equity research workspace
//!
//! This crate is the network seam between analysis orchestration and a hosted
//! large language model. It includes:
//!
//! - Message types for a single system/user exchange
//! - Completion request/response types with an explicit response contract
//! - A classified error type that separates "model unavailable" from every
//!   other provider failure
//! - The [`LLMProvider`] trait and a Perplexity (OpenAI-compatible) provider

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

pub use completion::{CompletionRequest, CompletionResponse, DEFAULT_MAX_TOKENS, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use providers::{PerplexityConfig, PerplexityProvider};
