pub mod concepts;
pub mod format;
pub mod future;
pub mod growth;
pub mod health;
pub mod ownership;
pub mod past;
pub mod period;
pub mod series;
pub mod summary;
pub mod ttm;

#[cfg(test)]
mod test_support;

pub use future::{compute_future_checklist, FutureChecklistKey, FutureChecklistOptions, FutureChecklistResult};
pub use health::{compute_financial_health, DebtSource, HealthChecklistKey, HealthChecklistOptions, HealthChecklistResult};
pub use ownership::{ownership_breakdown, OwnershipBreakdown};
pub use past::{compute_past_checklist, PastChecklistKey, PastChecklistOptions, PastChecklistResult};
pub use summary::{compute_summary_metrics, SummaryMetrics};

use analysis_core::{CompanyFacts, QuoteSummary};

/// Runs every disclosure-based analysis with one set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct FundamentalAnalysisEngine {
    pub past: PastChecklistOptions,
    pub future: FutureChecklistOptions,
    pub health: HealthChecklistOptions,
}

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(
        past: PastChecklistOptions,
        future: FutureChecklistOptions,
        health: HealthChecklistOptions,
    ) -> Self {
        Self { past, future, health }
    }

    pub fn past_checklist(&self, facts: &CompanyFacts) -> PastChecklistResult {
        compute_past_checklist(facts, &self.past)
    }

    pub fn future_checklist(&self, quote: &QuoteSummary) -> FutureChecklistResult {
        compute_future_checklist(quote, &self.future)
    }

    pub fn financial_health(&self, facts: &CompanyFacts, quote: Option<&QuoteSummary>) -> HealthChecklistResult {
        compute_financial_health(facts, quote, &self.health)
    }

    pub fn summary_metrics(&self, facts: &CompanyFacts) -> Option<SummaryMetrics> {
        compute_summary_metrics(facts)
    }

    pub fn ownership(&self, quote: &QuoteSummary) -> OwnershipBreakdown {
        ownership_breakdown(quote)
    }
}
