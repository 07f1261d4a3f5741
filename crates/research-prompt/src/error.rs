//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur while building or rendering prompt templates
///
/// The public render functions of [`crate::PromptCatalog`] never return these;
/// they surface only from strict construction and from identifier parsing.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Template parsing failed
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template rendering failed
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// Identifier does not name a known section
    #[error("Unknown section '{0}'")]
    UnknownSection(String),
}
