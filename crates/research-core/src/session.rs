//! Multi-section research runs
//!
//! A [`ResearchSession`] resolves each requested section to a prompt, sends
//! it through a [`Completer`], and gathers the results by section. Sections
//! are independent, so they can run one after another or all at once.

use crate::client::Completer;
use crate::error::Result;
use crate::request::{AnalysisRequest, AnalysisResult};
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use research_prompt::{AnalysisDepth, PromptCatalog, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Results of one research run, in requested section order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub ticker: String,
    pub as_of: NaiveDate,
    /// Depth the sections came from; `None` for an explicit section list
    pub depth: Option<AnalysisDepth>,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<AnalysisResult>,
}

impl ResearchReport {
    /// Result for a section, if it was requested
    pub fn get(&self, section: SectionId) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.section == section)
    }

    /// Number of sections that produced analysis text
    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    /// Sections that came back with a sentinel or error string
    pub fn failed_sections(&self) -> Vec<SectionId> {
        self.results
            .iter()
            .filter(|r| !r.succeeded)
            .map(|r| r.section)
            .collect()
    }

    /// Index the results by section
    pub fn into_map(self) -> HashMap<SectionId, AnalysisResult> {
        self.results.into_iter().map(|r| (r.section, r)).collect()
    }
}

/// Runs section prompts through a completer
#[derive(Clone)]
pub struct ResearchSession {
    completer: Arc<dyn Completer>,
    catalog: Arc<PromptCatalog>,
}

impl ResearchSession {
    pub fn new(completer: Arc<dyn Completer>, catalog: PromptCatalog) -> Self {
        Self {
            completer,
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    /// Run every section of `depth`, one at a time
    pub async fn run(&self, ticker: &str, as_of: NaiveDate, depth: AnalysisDepth) -> Result<ResearchReport> {
        let mut report = self.run_sections(ticker, as_of, depth.sections()).await?;
        report.depth = Some(depth);
        Ok(report)
    }

    /// Run an explicit list of sections, one at a time
    ///
    /// Repeated sections are requested once.
    #[instrument(skip(self, sections), fields(sections = sections.len()))]
    pub async fn run_sections(
        &self,
        ticker: &str,
        as_of: NaiveDate,
        sections: &[SectionId],
    ) -> Result<ResearchReport> {
        let requests = Self::requests(ticker, as_of, sections)?;
        info!(ticker = requests_ticker(&requests), count = requests.len(), "Starting research run");

        let mut results = Vec::with_capacity(requests.len());
        for request in &requests {
            results.push(self.completer.analyze(request, &self.catalog).await);
        }

        Ok(Self::finish(ticker, as_of, results))
    }

    /// Run an explicit list of sections concurrently
    ///
    /// Results keep the requested order.
    #[instrument(skip(self, sections), fields(sections = sections.len()))]
    pub async fn run_concurrent(
        &self,
        ticker: &str,
        as_of: NaiveDate,
        sections: &[SectionId],
    ) -> Result<ResearchReport> {
        let requests = Self::requests(ticker, as_of, sections)?;
        info!(ticker = requests_ticker(&requests), count = requests.len(), "Starting concurrent research run");

        let results = join_all(
            requests
                .iter()
                .map(|request| self.completer.analyze(request, &self.catalog)),
        )
        .await;

        Ok(Self::finish(ticker, as_of, results))
    }

    fn requests(ticker: &str, as_of: NaiveDate, sections: &[SectionId]) -> Result<Vec<AnalysisRequest>> {
        let mut seen = Vec::with_capacity(sections.len());
        for section in sections {
            if !seen.contains(section) {
                seen.push(*section);
            }
        }

        if seen.is_empty() {
            // Still validate the ticker so callers get a consistent error
            AnalysisRequest::new(ticker, as_of, SectionId::FinalRecommendation)?;
        }

        seen.into_iter()
            .map(|section| AnalysisRequest::new(ticker, as_of, section))
            .collect()
    }

    fn finish(ticker: &str, as_of: NaiveDate, results: Vec<AnalysisResult>) -> ResearchReport {
        let report = ResearchReport {
            ticker: research_prompt::normalize_ticker(ticker),
            as_of,
            depth: None,
            generated_at: Utc::now(),
            results,
        };
        info!(
            ticker = %report.ticker,
            succeeded = report.succeeded_count(),
            total = report.results.len(),
            "Research run finished"
        );
        report
    }
}

fn requests_ticker(requests: &[AnalysisRequest]) -> &str {
    requests.first().map_or("", AnalysisRequest::ticker)
}
