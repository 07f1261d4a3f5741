//! Concrete chat-completion providers

pub mod perplexity;

pub use perplexity::{PerplexityConfig, PerplexityProvider};
