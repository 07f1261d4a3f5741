//! Equity research completion layer
//!
//! This crate sends rendered section prompts to a chat-completion API and
//! turns the responses into per-section analysis text. It includes:
//!
//! - A completion client that walks an ordered list of model candidates and
//!   falls back only when a model is reported unavailable
//! - Fixed sentinel strings instead of errors for missing credentials and
//!   exhausted candidates
//! - A prompt-keyed cache decorator with a fixed time-to-live
//! - Sequential and concurrent multi-section research runs
//!
//! # Example
//!
//! ```rust,no_run
//! use research_core::{
//!     AnalysisDepth, CachedCompleter, CompletionClient, PromptCatalog, ResearchConfig,
//!     ResearchSession,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ResearchConfig::from_env()?;
//!     let ttl = config.cache_ttl;
//!     let client = CompletionClient::from_config(config)?;
//!
//!     let session = ResearchSession::new(
//!         Arc::new(CachedCompleter::new(client, ttl)),
//!         PromptCatalog::new(),
//!     );
//!
//!     let as_of = chrono::Local::now().date_naive();
//!     let report = session.run("TCS", as_of, AnalysisDepth::Quick).await?;
//!     for result in &report.results {
//!         println!("## {}\n{}\n", result.section.title(), result.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod session;

pub use cache::CachedCompleter;
pub use client::{
    ALL_MODELS_FAILED, Completer, Completion, CompletionClient, CompletionOutcome, CompletionSettings,
    ERROR_PREFIX, NOT_CONFIGURED,
};
pub use config::{ModelCandidates, ResearchConfig, ResearchConfigBuilder};
pub use error::{ResearchError, Result};
pub use request::{AnalysisRequest, AnalysisResult};
pub use session::{ResearchReport, ResearchSession};

// Re-export prompt types used in the public API
pub use research_prompt::{AnalysisDepth, PromptCatalog, SectionId};
