//! Analysis sections and depth presets

use crate::PromptError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One named unit of analysis, mapped to exactly one prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    SectorTrends,
    NewsCompetition,
    PnlAnalysis,
    BalanceSheet,
    CashFlow,
    RatioAnalysis,
    ManagementEvaluation,
    GuidanceDelivery,
    InvestorPresentations,
    ConferenceCalls,
    CommunitySentiment,
    AnnualReport,
    IntegrityMatrix,
    GrowthTriggers,
    ValuationAnalysis,
    ScenarioAnalysis,
    FinalRecommendation,
}

impl SectionId {
    /// Every section, in report order
    pub const ALL: [SectionId; 17] = [
        SectionId::SectorTrends,
        SectionId::NewsCompetition,
        SectionId::PnlAnalysis,
        SectionId::BalanceSheet,
        SectionId::CashFlow,
        SectionId::RatioAnalysis,
        SectionId::ManagementEvaluation,
        SectionId::GuidanceDelivery,
        SectionId::InvestorPresentations,
        SectionId::ConferenceCalls,
        SectionId::CommunitySentiment,
        SectionId::AnnualReport,
        SectionId::IntegrityMatrix,
        SectionId::GrowthTriggers,
        SectionId::ValuationAnalysis,
        SectionId::ScenarioAnalysis,
        SectionId::FinalRecommendation,
    ];

    /// Stable snake_case identifier
    pub fn id(self) -> &'static str {
        match self {
            SectionId::SectorTrends => "sector_trends",
            SectionId::NewsCompetition => "news_competition",
            SectionId::PnlAnalysis => "pnl_analysis",
            SectionId::BalanceSheet => "balance_sheet",
            SectionId::CashFlow => "cash_flow",
            SectionId::RatioAnalysis => "ratio_analysis",
            SectionId::ManagementEvaluation => "management_evaluation",
            SectionId::GuidanceDelivery => "guidance_delivery",
            SectionId::InvestorPresentations => "investor_presentations",
            SectionId::ConferenceCalls => "conference_calls",
            SectionId::CommunitySentiment => "community_sentiment",
            SectionId::AnnualReport => "annual_report",
            SectionId::IntegrityMatrix => "integrity_matrix",
            SectionId::GrowthTriggers => "growth_triggers",
            SectionId::ValuationAnalysis => "valuation_analysis",
            SectionId::ScenarioAnalysis => "scenario_analysis",
            SectionId::FinalRecommendation => "final_recommendation",
        }
    }

    /// Human-readable heading
    pub fn title(self) -> &'static str {
        match self {
            SectionId::SectorTrends => "Sector Trends & Triggers",
            SectionId::NewsCompetition => "News & Competition",
            SectionId::PnlAnalysis => "P&L Analysis",
            SectionId::BalanceSheet => "Balance Sheet",
            SectionId::CashFlow => "Cash Flow",
            SectionId::RatioAnalysis => "Ratio Analysis",
            SectionId::ManagementEvaluation => "Management Eval",
            SectionId::GuidanceDelivery => "Guidance Delivery",
            SectionId::InvestorPresentations => "Presentations",
            SectionId::ConferenceCalls => "Conference Calls",
            SectionId::CommunitySentiment => "Community Sentiment",
            SectionId::AnnualReport => "Annual Report",
            SectionId::IntegrityMatrix => "Integrity Matrix",
            SectionId::GrowthTriggers => "Growth Triggers",
            SectionId::ValuationAnalysis => "Valuation",
            SectionId::ScenarioAnalysis => "Scenario Analysis",
            SectionId::FinalRecommendation => "Final Recommendation",
        }
    }

    /// Look up a section by identifier or title
    ///
    /// Matching ignores case, surrounding whitespace, and treats `-` like `_`.
    ///
    /// # Examples
    ///
    /// ```
    /// use research_prompt::SectionId;
    ///
    /// assert_eq!(SectionId::from_id("valuation_analysis"), Some(SectionId::ValuationAnalysis));
    /// assert_eq!(SectionId::from_id("Cash-Flow"), Some(SectionId::CashFlow));
    /// assert_eq!(SectionId::from_id("P&L Analysis"), Some(SectionId::PnlAnalysis));
    /// assert_eq!(SectionId::from_id("horoscope"), None);
    /// ```
    pub fn from_id(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|s| s.id() == needle || s.title().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SectionId {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| PromptError::UnknownSection(s.to_string()))
    }
}

/// How many sections a research run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    /// Sector, valuation and the final call
    Quick,
    /// Financial statements, growth and valuation
    #[default]
    Standard,
    /// Every section in the catalog
    Comprehensive,
}

impl AnalysisDepth {
    /// Sections covered at this depth, in report order
    pub fn sections(self) -> &'static [SectionId] {
        const QUICK: &[SectionId] = &[
            SectionId::SectorTrends,
            SectionId::ValuationAnalysis,
            SectionId::FinalRecommendation,
        ];
        const STANDARD: &[SectionId] = &[
            SectionId::SectorTrends,
            SectionId::NewsCompetition,
            SectionId::PnlAnalysis,
            SectionId::BalanceSheet,
            SectionId::CashFlow,
            SectionId::RatioAnalysis,
            SectionId::GrowthTriggers,
            SectionId::ValuationAnalysis,
            SectionId::FinalRecommendation,
        ];

        match self {
            AnalysisDepth::Quick => QUICK,
            AnalysisDepth::Standard => STANDARD,
            AnalysisDepth::Comprehensive => &SectionId::ALL,
        }
    }
}

impl fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisDepth::Quick => "quick",
            AnalysisDepth::Standard => "standard",
            AnalysisDepth::Comprehensive => "comprehensive",
        };
        f.write_str(name)
    }
}
