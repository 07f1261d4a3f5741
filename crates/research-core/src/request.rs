//! Per-section analysis requests and results

use crate::client::{Completion, CompletionOutcome};
use crate::error::{ResearchError, Result};
use chrono::NaiveDate;
use research_prompt::{PromptCatalog, SectionId, normalize_ticker};
use serde::{Deserialize, Serialize};

/// One section of analysis for one ticker on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    ticker: String,
    as_of: NaiveDate,
    section: SectionId,
}

impl AnalysisRequest {
    /// Create a request, normalizing the ticker to uppercase
    pub fn new(ticker: &str, as_of: NaiveDate, section: SectionId) -> Result<Self> {
        let normalized = normalize_ticker(ticker);
        if normalized.is_empty() {
            return Err(ResearchError::InvalidTicker(ticker.to_string()));
        }
        Ok(Self {
            ticker: normalized,
            as_of,
            section,
        })
    }

    /// Uppercase ticker
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn section(&self) -> SectionId {
        self.section
    }

    /// Render this request's prompt
    pub fn prompt(&self, catalog: &PromptCatalog) -> String {
        catalog.render(self.section, &self.ticker, self.as_of)
    }
}

/// Analysis text for one section
///
/// `text` is never empty. When `succeeded` is false it holds the sentinel or
/// error string produced by the completion client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub section: SectionId,
    pub text: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl AnalysisResult {
    /// Attach a completion to the section it answers
    pub fn from_completion(section: SectionId, completion: Completion) -> Self {
        Self {
            section,
            succeeded: completion.outcome == CompletionOutcome::Succeeded,
            text: completion.text,
            model_used: completion.model_used,
        }
    }
}
