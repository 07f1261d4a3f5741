//! Prompt template sources
//!
//! Every template receives `ticker` (trimmed, uppercase) and `as_of`
//! (formatted `%d %b %Y`), and must mention both.

use crate::SectionId;

/// Name the default template is registered under
pub const DEFAULT_TEMPLATE_NAME: &str = "default";

/// Used for unknown sections and whenever a section template cannot render
pub const DEFAULT_TEMPLATE: &str = "Provide a concise equity research overview of {{ ticker }} as of {{ as_of }}. \
Cover the business model, recent financial performance, valuation, and the key risks an investor should watch.";

/// Template source for a section
pub fn source(section: SectionId) -> &'static str {
    match section {
        SectionId::SectorTrends => {
            "Analyze sector trends for {{ ticker }} as of {{ as_of }}. Provide drivers, risks, and concrete examples."
        }
        SectionId::NewsCompetition => {
            "Summarize the last 30 days of news for {{ ticker }} up to {{ as_of }}. \
Classify each item as positive, neutral, or negative and describe the competitive landscape."
        }
        SectionId::PnlAnalysis => {
            "Give a 5-year P&L deep dive for {{ ticker }} as of {{ as_of }}. Detail revenue, margins, and seasonality."
        }
        SectionId::BalanceSheet => {
            "Give a 5-year balance sheet analysis for {{ ticker }} as of {{ as_of }}. Detail assets, liabilities, and debt ratios."
        }
        SectionId::CashFlow => {
            "Give a 5-year cash flow analysis for {{ ticker }} as of {{ as_of }}. Detail operating cash flow and free cash flow trends."
        }
        SectionId::RatioAnalysis => {
            "Provide ROE, ROA, margin, liquidity, leverage, and valuation ratios for {{ ticker }} as of {{ as_of }}, \
each compared with the industry average."
        }
        SectionId::ManagementEvaluation => {
            "Evaluate the management quality of {{ ticker }} as of {{ as_of }}: background, track record, and governance."
        }
        SectionId::GuidanceDelivery => {
            "Assess management guidance against actual results for {{ ticker }} over the 3 years up to {{ as_of }}."
        }
        SectionId::InvestorPresentations => {
            "Summarize the key themes from the last 12 investor presentations by {{ ticker }} published before {{ as_of }}."
        }
        SectionId::ConferenceCalls => {
            "Summarize the tone and key updates from the last 12 quarterly earnings calls of {{ ticker }} up to {{ as_of }}."
        }
        SectionId::CommunitySentiment => {
            "Analyze retail investor forum sentiment about {{ ticker }} over the 90 days up to {{ as_of }}."
        }
        SectionId::AnnualReport => {
            "Perform a forensic analysis of the latest annual report of {{ ticker }} available as of {{ as_of }}. Highlight red flags."
        }
        SectionId::IntegrityMatrix => {
            "Score the management integrity of {{ ticker }} as of {{ as_of }} on guidance accuracy, transparency, and governance."
        }
        SectionId::GrowthTriggers => {
            "Identify the key growth catalysts for {{ ticker }} as of {{ as_of }}, with expected timelines and impact."
        }
        SectionId::ValuationAnalysis => {
            "Value {{ ticker }} as of {{ as_of }} using P/E, EV/EBITDA, a DCF, and a peer comparison."
        }
        SectionId::ScenarioAnalysis => {
            "Lay out bull, base, and bear cases for {{ ticker }} as of {{ as_of }}, with price targets and probabilities."
        }
        SectionId::FinalRecommendation => {
            "Write an executive recommendation for {{ ticker }} as of {{ as_of }}: Buy, Hold, or Sell, with a target price. \
End with the single word rating."
        }
    }
}
