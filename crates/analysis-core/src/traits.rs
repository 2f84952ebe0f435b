use async_trait::async_trait;
use crate::{AnalysisError, CompanyFacts, OptionChain, QuoteSummary};

/// Source of the regulatory company-facts payload, keyed by CIK.
#[async_trait]
pub trait CompanyFactsProvider: Send + Sync {
    async fn company_facts(&self, cik: &str) -> Result<CompanyFacts, AnalysisError>;
}

/// Source of market quote-summary modules for a ticker.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote_summary(&self, symbol: &str) -> Result<QuoteSummary, AnalysisError>;
}

/// Source of the options chain for a ticker.
#[async_trait]
pub trait OptionsProvider: Send + Sync {
    async fn option_chain(&self, symbol: &str) -> Result<OptionChain, AnalysisError>;
}
