//! report-cli: score one company from saved payloads or the SEC facts API.
//!
//! Usage:
//!   cargo run -p report-cli -- --symbol AAPL --cik 320193 --sec --quote quote.json --options chain.json
//!   cargo run -p report-cli -- --symbol ABC --cik 1 --facts facts.json --pretty

mod providers;

use analysis_orchestrator::{ReportConfig, StockReportOrchestrator};
use anyhow::{bail, Context};
use providers::{JsonFileProvider, SecCompanyFactsClient};
use std::sync::Arc;

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_cli=info,analysis_orchestrator=info,fundamental_analysis=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let pretty = args.iter().any(|a| a == "--pretty");
    let use_sec = args.iter().any(|a| a == "--sec");

    let Some(symbol) = arg_value(&args, "--symbol") else {
        bail!("usage: report-cli --symbol TICKER [--cik CIK] [--facts FILE | --sec] [--quote FILE] [--options FILE] [--pretty]");
    };
    let cik = arg_value(&args, "--cik");

    let config = ReportConfig::from_env().context("loading report configuration")?;
    let mut orchestrator = StockReportOrchestrator::new(config.clone());

    if let Some(path) = arg_value(&args, "--facts") {
        orchestrator = orchestrator.with_facts_provider(Arc::new(JsonFileProvider::new(path)));
    } else if use_sec {
        if cik.is_none() {
            bail!("--sec needs --cik");
        }
        orchestrator = orchestrator.with_facts_provider(Arc::new(SecCompanyFactsClient::new(&config.sec_user_agent)));
    }
    if let Some(path) = arg_value(&args, "--quote") {
        orchestrator = orchestrator.with_quote_provider(Arc::new(JsonFileProvider::new(path)));
    }
    if let Some(path) = arg_value(&args, "--options") {
        orchestrator = orchestrator.with_options_provider(Arc::new(JsonFileProvider::new(path)));
    }

    let report = orchestrator.build_report(symbol, cik).await;
    if !(report.sources.company_facts || report.sources.quote || report.sources.options) {
        tracing::warn!("No feed delivered data for {}; every section is not available", symbol);
    }

    let out = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", out);

    Ok(())
}
