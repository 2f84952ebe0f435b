use analysis_core::{
    AnalysisError, CompanyFacts, CompanyFactsProvider, OptionChain, OptionsProvider, OptionsSnapshot, QuoteProvider,
    QuoteSummary,
};
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use fundamental_analysis::{
    FundamentalAnalysisEngine, FutureChecklistResult, HealthChecklistResult, OwnershipBreakdown, PastChecklistResult,
    SummaryMetrics,
};
use options_analytics::build_snapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod config;
pub use config::ReportConfig;


/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// CIKs arrive padded or unpadded; both map to one entry.
fn facts_cache_key(cik: &str) -> String {
    match cik.trim().trim_start_matches('0') {
        "" => "0".to_string(),
        digits => digits.to_string(),
    }
}

fn cached<T: Clone>(cache: &DashMap<String, CacheEntry<T>>, key: &str, ttl_secs: i64) -> Option<T> {
    let entry = cache.get(key)?;
    let age = (Utc::now() - entry.cached_at).num_seconds();
    (age < ttl_secs).then(|| entry.data.clone())
}

/// Which feeds actually delivered data for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSources {
    pub company_facts: bool,
    pub quote: bool,
    pub options: bool,
}

/// Everything computed for one company. Each section carries the date it
/// was computed as of; feeds are not reconciled against each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReport {
    pub symbol: String,
    pub cik: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub sources: ReportSources,
    pub summary: Option<SummaryMetrics>,
    pub past: PastChecklistResult,
    pub future: FutureChecklistResult,
    pub health: HealthChecklistResult,
    pub ownership: Option<OwnershipBreakdown>,
    pub options: Option<OptionsSnapshot>,
}

impl StockReport {
    /// Latest disclosure date any section used.
    pub fn as_of(&self) -> Option<NaiveDate> {
        [
            self.summary.as_ref().map(|s| s.recent_end),
            self.past.as_of,
            self.health.as_of,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

pub struct StockReportOrchestrator {
    config: ReportConfig,
    engine: FundamentalAnalysisEngine,
    facts_provider: Option<Arc<dyn CompanyFactsProvider>>,
    quote_provider: Option<Arc<dyn QuoteProvider>>,
    options_provider: Option<Arc<dyn OptionsProvider>>,
    /// Company facts per CIK
    facts_cache: DashMap<String, CacheEntry<CompanyFacts>>,
    /// Option chains per symbol
    options_cache: DashMap<String, CacheEntry<OptionChain>>,
}

impl StockReportOrchestrator {
    pub fn new(config: ReportConfig) -> Self {
        let engine = FundamentalAnalysisEngine::with_options(config.past, config.future, config.health);
        Self {
            config,
            engine,
            facts_provider: None,
            quote_provider: None,
            options_provider: None,
            facts_cache: DashMap::new(),
            options_cache: DashMap::new(),
        }
    }

    pub fn with_facts_provider(mut self, provider: Arc<dyn CompanyFactsProvider>) -> Self {
        self.facts_provider = Some(provider);
        self
    }

    pub fn with_quote_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.quote_provider = Some(provider);
        self
    }

    pub fn with_options_provider(mut self, provider: Arc<dyn OptionsProvider>) -> Self {
        self.options_provider = Some(provider);
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn clear_caches(&self) {
        self.facts_cache.clear();
        self.options_cache.clear();
    }

    /// Fetch every feed concurrently and score the company. Missing or
    /// failed feeds degrade to "not available" sections rather than errors.
    pub async fn build_report(&self, symbol: &str, cik: Option<&str>) -> StockReport {
        tracing::info!("Building report for {} (cik: {:?})", symbol, cik);

        let (facts, quote, chain) = tokio::join!(
            self.fetch_company_facts(cik),
            self.fetch_quote(symbol),
            self.fetch_option_chain(symbol),
        );

        let sources = ReportSources {
            company_facts: facts.is_some(),
            quote: quote.is_some(),
            options: chain.is_some(),
        };

        let facts = facts.unwrap_or_default();
        let summary = self.engine.summary_metrics(&facts);
        let past = self.engine.past_checklist(&facts);
        let health = self.engine.financial_health(&facts, quote.as_ref());

        let future = match quote.as_ref() {
            Some(q) => self.engine.future_checklist(q),
            None => self.engine.future_checklist(&QuoteSummary::default()),
        };
        let ownership = quote.as_ref().map(|q| self.engine.ownership(q));

        let spot = quote.as_ref().and_then(|q| q.spot_price());
        let options = chain.and_then(|c| build_snapshot(&c, spot, &self.config.options));

        tracing::info!(
            "Report for {}: past {}/5, future {}/4, health {}/5",
            symbol,
            past.score,
            future.score,
            health.score
        );

        StockReport {
            symbol: symbol.to_uppercase(),
            cik: cik.map(str::to_string),
            generated_at: Utc::now(),
            sources,
            summary,
            past,
            future,
            health,
            ownership,
            options,
        }
    }

    async fn fetch_company_facts(&self, cik: Option<&str>) -> Option<CompanyFacts> {
        let (provider, cik) = match (self.facts_provider.as_ref(), cik) {
            (Some(p), Some(c)) => (p, c),
            _ => return None,
        };
        match self.get_company_facts(provider.as_ref(), cik).await {
            Ok(facts) => Some(facts),
            Err(e) => {
                tracing::warn!("Company facts unavailable for CIK {}: {}", cik, e);
                None
            }
        }
    }

    async fn fetch_quote(&self, symbol: &str) -> Option<QuoteSummary> {
        let provider = self.quote_provider.as_ref()?;
        match provider.quote_summary(symbol).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!("Quote summary unavailable for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn fetch_option_chain(&self, symbol: &str) -> Option<OptionChain> {
        let provider = self.options_provider.as_ref()?;
        match self.get_option_chain(provider.as_ref(), symbol).await {
            Ok(chain) => Some(chain),
            Err(e) => {
                tracing::warn!("Option chain unavailable for {}: {}", symbol, e);
                None
            }
        }
    }

    /// Company facts (cached, facts TTL)
    async fn get_company_facts(
        &self,
        provider: &dyn CompanyFactsProvider,
        cik: &str,
    ) -> Result<CompanyFacts, AnalysisError> {
        let cache_key = facts_cache_key(cik);
        if let Some(facts) = cached(&self.facts_cache, &cache_key, self.config.facts_cache_ttl_secs) {
            return Ok(facts);
        }

        let facts = provider.company_facts(cik).await?;

        self.facts_cache.insert(cache_key, CacheEntry {
            data: facts.clone(),
            cached_at: Utc::now(),
        });

        Ok(facts)
    }

    /// Option chain (cached, options TTL)
    async fn get_option_chain(
        &self,
        provider: &dyn OptionsProvider,
        symbol: &str,
    ) -> Result<OptionChain, AnalysisError> {
        let cache_key = symbol.to_uppercase();
        if let Some(chain) = cached(&self.options_cache, &cache_key, self.config.options_cache_ttl_secs) {
            return Ok(chain);
        }

        let chain = provider.option_chain(symbol).await?;

        self.options_cache.insert(cache_key, CacheEntry {
            data: chain.clone(),
            cached_at: Utc::now(),
        });

        Ok(chain)
    }
}
