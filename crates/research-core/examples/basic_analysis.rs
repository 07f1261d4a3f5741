//! Basic research example
//!
//! Runs the quick-depth sections for one ticker and prints each section.
//!
//! To run this example:
//! ```bash
//! # Without a key every section prints the not-configured notice
//! export PPLX_API_KEY=your_key_here
//!
//! cargo run --example basic_analysis TCS
//! ```

use research_core::{
    AnalysisDepth, CachedCompleter, Completer, CompletionClient, PromptCatalog, ResearchConfig,
    ResearchSession, SectionId,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    research_utils::init_tracing();

    let args: Vec<String> = env::args().collect();
    let ticker = args.get(1).map_or("TCS", String::as_str);
    let as_of = chrono::Local::now().date_naive();

    println!("=== Equity Research ===\n");
    println!("Ticker: {ticker}");
    println!("As of:  {}\n", research_prompt::format_as_of(as_of));

    let config = ResearchConfig::from_env()?;
    println!("Configuration:");
    println!("  - API key set: {}", config.has_api_key());
    println!("  - Candidates: {:?}", config.candidates.iter().collect::<Vec<_>>());
    println!("  - Cache TTL: {:?}\n", config.cache_ttl);

    let ttl = config.cache_ttl;
    let client = CachedCompleter::new(CompletionClient::from_config(config)?, ttl);
    let catalog = PromptCatalog::new();

    // 1. A single prompt through the client
    println!("=== 1. Single Section ===");
    let prompt = catalog.render(SectionId::ValuationAnalysis, ticker, as_of);
    let completion = client.complete_detailed(&prompt).await;
    println!("Outcome: {:?}", completion.outcome);
    println!("{}\n", completion.text);

    // 2. Same prompt again comes from the cache on success
    println!("=== 2. Cached Repeat ===");
    let again = client.complete(&prompt).await;
    println!("Identical: {}\n", again == completion.text);

    // 3. Quick-depth run
    println!("=== 3. Quick Research Run ===");
    let session = ResearchSession::new(Arc::new(client), catalog);
    let report = session.run(ticker, as_of, AnalysisDepth::Quick).await?;
    for result in &report.results {
        println!("## {}\n{}\n", result.section.title(), result.text);
    }

    println!(
        "=== Complete: {}/{} sections succeeded ===",
        report.succeeded_count(),
        report.results.len()
    );
    Ok(())
}
