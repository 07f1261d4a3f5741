//! Section prompt catalog for equity research
//!
//! This crate turns an analysis section, a ticker, and an as-of date into the
//! prompt text sent to the language model. It is pure: no network access and
//! no shared mutable state.
//!
//! # Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use research_prompt::{AnalysisDepth, PromptCatalog};
//!
//! let catalog = PromptCatalog::new();
//! let as_of = NaiveDate::from_ymd_opt(2025, 7, 25).unwrap();
//!
//! for section in AnalysisDepth::Quick.sections() {
//!     let prompt = catalog.render(*section, "TCS", as_of);
//!     assert!(prompt.contains("TCS"));
//! }
//! ```

mod catalog;
mod error;
mod section;
mod templates;

pub use catalog::{AS_OF_FORMAT, PromptCatalog, format_as_of, normalize_ticker};
pub use error::{PromptError, Result};
pub use section::{AnalysisDepth, SectionId};
pub use templates::DEFAULT_TEMPLATE;
