//! Command-line front end for equity research runs
//!
//! # Usage
//!
//! ```bash
//! export PPLX_API_KEY=your_key_here
//!
//! # Standard depth for today
//! research --ticker TCS
//!
//! # Two sections for a fixed date, run concurrently
//! research --ticker INFY --date "25 Jul 2025" --section cash_flow --section valuation_analysis --concurrent
//!
//! # Print the prompts without calling the API
//! research --ticker TCS --depth quick --show-prompts
//! ```

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use research_core::{
    AnalysisDepth, CachedCompleter, Completer, CompletionClient, PromptCatalog, ResearchConfig,
    ResearchReport, ResearchSession, SectionId,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "research")]
#[command(about = "Section-by-section equity research from a chat-completion API", long_about = None)]
struct Args {
    /// Ticker symbol, e.g. TCS
    #[arg(short, long, required_unless_present = "list_sections")]
    ticker: Option<String>,

    /// As-of date, "25 Jul 2025" or 2025-07-25 (defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Which set of sections to run
    #[arg(long, value_enum, default_value_t = DepthArg::Standard)]
    depth: DepthArg,

    /// Run specific sections instead of a depth (repeatable)
    #[arg(short, long = "section", value_name = "ID")]
    sections: Vec<SectionId>,

    /// Request all sections at once
    #[arg(long)]
    concurrent: bool,

    /// Do not memoize completions
    #[arg(long)]
    no_cache: bool,

    /// List section ids and exit
    #[arg(long)]
    list_sections: bool,

    /// Print the rendered prompts without calling the API
    #[arg(long)]
    show_prompts: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DepthArg {
    Quick,
    Standard,
    Comprehensive,
}

impl From<DepthArg> for AnalysisDepth {
    fn from(depth: DepthArg) -> Self {
        match depth {
            DepthArg::Quick => AnalysisDepth::Quick,
            DepthArg::Standard => AnalysisDepth::Standard,
            DepthArg::Comprehensive => AnalysisDepth::Comprehensive,
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, research_prompt::AS_OF_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date {raw:?}, expected \"25 Jul 2025\" or 2025-07-25"))
}

fn print_sections() {
    for section in SectionId::ALL {
        println!("{:<22} {}", section.id(), section.title());
    }
}

fn print_report(report: &ResearchReport) {
    println!(
        "# {} as of {}\n",
        report.ticker,
        research_prompt::format_as_of(report.as_of)
    );
    for result in &report.results {
        println!("## {}\n", result.section.title());
        println!("{}\n", result.text);
    }
    let failed = report.failed_sections();
    if !failed.is_empty() {
        let ids: Vec<_> = failed.iter().map(|s| s.id()).collect();
        eprintln!("Sections without analysis: {}", ids.join(", "));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    research_utils::init_tracing_with("warn,research_core=info");

    let args = Args::parse();

    if args.list_sections {
        print_sections();
        return Ok(());
    }

    let Some(ticker) = args.ticker.as_deref() else {
        bail!("--ticker is required");
    };
    let as_of = args.date.unwrap_or_else(|| Local::now().date_naive());
    let depth = AnalysisDepth::from(args.depth);
    let sections: &[SectionId] = if args.sections.is_empty() {
        depth.sections()
    } else {
        &args.sections
    };

    let catalog = PromptCatalog::new();

    if args.show_prompts {
        for section in sections {
            println!("## {}\n", section.title());
            println!("{}\n", catalog.render(*section, ticker, as_of));
        }
        return Ok(());
    }

    let config = ResearchConfig::from_env().context("Failed to load configuration")?;
    if !config.has_api_key() {
        eprintln!("Warning: PPLX_API_KEY not set, sections will carry the not-configured notice");
    }

    let ttl = config.cache_ttl;
    let client = CompletionClient::from_config(config)?;
    let completer: Arc<dyn Completer> = if args.no_cache {
        Arc::new(client)
    } else {
        Arc::new(CachedCompleter::new(client, ttl))
    };

    info!(ticker, depth = %depth, sections = sections.len(), "Starting research");
    let session = ResearchSession::new(completer, catalog);
    let report = match (args.concurrent, args.sections.is_empty()) {
        (true, true) => {
            let mut report = session.run_concurrent(ticker, as_of, sections).await?;
            report.depth = Some(depth);
            report
        }
        (true, false) => session.run_concurrent(ticker, as_of, sections).await?,
        (false, true) => session.run(ticker, as_of, depth).await?,
        (false, false) => session.run_sections(ticker, as_of, sections).await?,
    };

    print_report(&report);
    Ok(())
}
