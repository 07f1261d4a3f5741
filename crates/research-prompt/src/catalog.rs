//! MiniJinja-backed section prompt catalog
//!
//! [`PromptCatalog`] maps `(section, ticker, date)` to prompt text. Rendering
//! is total: unknown section identifiers and template failures both degrade
//! to the default overview prompt instead of returning an error.

use crate::templates::{self, DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_NAME};
use crate::{PromptError, Result, SectionId};
use chrono::NaiveDate;
use minijinja::{Environment, context};
use tracing::warn;

/// Date format used inside prompts, e.g. `25 Jul 2025`
pub const AS_OF_FORMAT: &str = "%d %b %Y";

/// Format a date the way prompts expect it
pub fn format_as_of(date: NaiveDate) -> String {
    date.format(AS_OF_FORMAT).to_string()
}

/// Trim and uppercase a ticker symbol
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Static catalog of section prompt templates
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use research_prompt::{PromptCatalog, SectionId};
///
/// let catalog = PromptCatalog::new();
/// let date = NaiveDate::from_ymd_opt(2025, 7, 25).unwrap();
///
/// let prompt = catalog.render(SectionId::ValuationAnalysis, "tcs", date);
/// assert!(prompt.contains("TCS"));
/// assert!(prompt.contains("25 Jul 2025"));
///
/// // Unknown identifiers fall back to the default template
/// let fallback = catalog.render_id("horoscope", "TCS", date);
/// assert!(fallback.contains("overview"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    env: Environment<'static>,
}

impl PromptCatalog {
    /// Build the catalog, logging and skipping any template that fails to parse
    ///
    /// A skipped section renders through the default template.
    pub fn new() -> Self {
        let mut env = Environment::new();
        for (name, source) in Self::sources() {
            if let Err(e) = env.add_template(name, source) {
                warn!(template = name, error = %e, "skipping unparseable prompt template");
            }
        }
        Self { env }
    }

    /// Build the catalog, failing on the first template that does not parse
    pub fn try_new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in Self::sources() {
            env.add_template(name, source)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: name.to_string(),
                    detail: e.to_string(),
                })?;
        }
        Ok(Self { env })
    }

    fn sources() -> impl Iterator<Item = (&'static str, &'static str)> {
        SectionId::ALL
            .into_iter()
            .map(|s| (s.id(), templates::source(s)))
            .chain(std::iter::once((DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE)))
    }

    /// Sections this catalog can render, in report order
    pub fn sections(&self) -> &'static [SectionId] {
        &SectionId::ALL
    }

    /// Render the prompt for a section
    pub fn render(&self, section: SectionId, ticker: &str, as_of: NaiveDate) -> String {
        self.render_or_default(section.id(), ticker, as_of)
    }

    /// Render the prompt for a section identifier
    ///
    /// Identifiers are matched with [`SectionId::from_id`]; anything else
    /// renders the default template.
    pub fn render_id(&self, section_id: &str, ticker: &str, as_of: NaiveDate) -> String {
        match SectionId::from_id(section_id) {
            Some(section) => self.render(section, ticker, as_of),
            None => {
                tracing::debug!(section_id, "unknown section, using default template");
                self.render_default(ticker, as_of)
            }
        }
    }

    /// Render the default overview prompt
    pub fn render_default(&self, ticker: &str, as_of: NaiveDate) -> String {
        self.render_or_default(DEFAULT_TEMPLATE_NAME, ticker, as_of)
    }

    fn render_or_default(&self, name: &str, ticker: &str, as_of: NaiveDate) -> String {
        let ticker = normalize_ticker(ticker);
        let as_of = format_as_of(as_of);

        match self.render_named(name, &ticker, &as_of) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "prompt template failed, using default prompt");
                self.render_named(DEFAULT_TEMPLATE_NAME, &ticker, &as_of)
                    .unwrap_or_else(|_| plain_default(&ticker, &as_of))
            }
        }
    }

    fn render_named(&self, name: &str, ticker: &str, as_of: &str) -> Result<String> {
        let render_error = |e: minijinja::Error| PromptError::RenderError {
            name: name.to_string(),
            detail: e.to_string(),
        };

        self.env
            .get_template(name)
            .map_err(render_error)?
            .render(context! { ticker => ticker, as_of => as_of })
            .map_err(render_error)
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompt produced without the template engine
fn plain_default(ticker: &str, as_of: &str) -> String {
    DEFAULT_TEMPLATE
        .replace("{{ ticker }}", ticker)
        .replace("{{ as_of }}", as_of)
}
