//! Forward-looking checklist from analyst consensus in the quote summary.

use analysis_core::{checklist_score, ChecklistItem, QuoteSummary, TrendRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::format_pct;

/// Consensus rows consulted for the long-run earnings growth, best first.
const GROWTH_PERIODS: &[&str] = &["+5y", "+1y", "0y"];

/// Rows whose EPS estimates decide the loss guard.
const FORWARD_EPS_PERIODS: &[&str] = &["+1y", "+2y", "+3y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FutureChecklistKey {
    HighGrowthEarnings,
    HighGrowthRevenue,
    EarningsVsSavingsRate,
    FutureRoe,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FutureChecklistOptions {
    pub savings_rate: f64,
    pub high_growth_threshold: f64,
    pub roe_threshold: f64,
}

impl Default for FutureChecklistOptions {
    fn default() -> Self {
        Self {
            savings_rate: 0.03,
            high_growth_threshold: 0.20,
            roe_threshold: 0.20,
        }
    }
}

/// Which estimate fed the earnings-growth figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthSource {
    EarningsGrowth,
    EpsGrowth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FutureKeyFacts {
    pub earnings_growth: Option<f64>,
    pub eps_growth: Option<f64>,
    /// Larger of the two normalized growth figures; what the growth items test.
    pub growth_for_pass: Option<f64>,
    pub growth_source: Option<GrowthSource>,
    pub revenue_growth: Option<f64>,
    pub forward_roe: Option<f64>,
    pub forward_eps: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureChecklistResult {
    pub score: u32,
    pub items: Vec<ChecklistItem<FutureChecklistKey>>,
    pub as_of: Option<NaiveDate>,
    pub key_facts: FutureKeyFacts,
}

/// Providers sometimes send `25.1` for 25.1%.
fn normalize_growth(value: Option<f64>) -> Option<f64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| if v > 1.0 { v / 100.0 } else { v })
}

fn earnings_growth(row: Option<&TrendRow>) -> Option<f64> {
    let row = row?;
    row.growth
        .or_else(|| row.earnings_estimate.as_ref().and_then(|e| e.growth))
}

fn eps_growth(row: Option<&TrendRow>) -> Option<f64> {
    let row = row?;
    let current = row.eps_trend.as_ref().and_then(|t| t.current);
    let year_ago = row.earnings_estimate.as_ref().and_then(|e| e.year_ago_eps);
    match (current, year_ago) {
        (Some(current), Some(year_ago)) if year_ago != 0.0 => Some((current - year_ago) / year_ago.abs()),
        _ => row.earnings_estimate.as_ref().and_then(|e| e.growth),
    }
}

fn revenue_growth(quote: &QuoteSummary) -> Option<f64> {
    let trend = quote.earnings_trend.as_ref()?;
    trend
        .row("+1y")
        .or_else(|| trend.row("0y"))
        .and_then(|row| row.revenue_estimate.as_ref())
        .and_then(|r| r.growth)
}

fn forward_eps(quote: &QuoteSummary) -> Vec<f64> {
    let Some(trend) = quote.earnings_trend.as_ref() else {
        return Vec::new();
    };
    FORWARD_EPS_PERIODS
        .iter()
        .filter_map(|period| trend.row(period))
        .filter_map(|row| row.earnings_estimate.as_ref().and_then(|e| e.avg))
        .collect()
}

fn as_of(quote: &QuoteSummary) -> Option<NaiveDate> {
    quote
        .earnings_trend
        .as_ref()
        .and_then(|t| t.trend.first())
        .and_then(|row| row.end_date)
        .or_else(|| quote.financial_data.as_ref().and_then(|fd| fd.most_recent_quarter))
}

pub fn compute_future_checklist(quote: &QuoteSummary, opts: &FutureChecklistOptions) -> FutureChecklistResult {
    let growth_row = quote
        .earnings_trend
        .as_ref()
        .and_then(|t| t.row_by_priority(GROWTH_PERIODS));

    let earnings = normalize_growth(earnings_growth(growth_row));
    let eps = normalize_growth(eps_growth(growth_row));
    let (growth_for_pass, growth_source) = match (earnings, eps) {
        (Some(e), Some(p)) if p > e => (Some(p), Some(GrowthSource::EpsGrowth)),
        (Some(e), _) => (Some(e), Some(GrowthSource::EarningsGrowth)),
        (None, Some(p)) => (Some(p), Some(GrowthSource::EpsGrowth)),
        (None, None) => (None, None),
    };

    let forward_eps = forward_eps(quote);
    let loss_for_3y = !forward_eps.is_empty() && forward_eps.iter().all(|eps| *eps <= 0.0);
    let profitable_soon = forward_eps.iter().any(|eps| *eps > 0.0);
    let earnings_ok = !loss_for_3y && profitable_soon;

    let revenue = revenue_growth(quote);

    // Earnings growth when quoted, else the EPS-derived figure.
    let roe_growth = earnings.or(eps);
    let forward_roe = match (quote.financial_data.as_ref().and_then(|fd| fd.return_on_equity), roe_growth) {
        (Some(roe), Some(g)) => Some(roe * (1.0 + g)),
        _ => None,
    };

    let growth_detail = |threshold: f64| -> String {
        if loss_for_3y {
            return "forward EPS estimates are all non-positive".to_string();
        }
        match growth_for_pass {
            Some(g) if !profitable_soon => format!(
                "growth {} but no positive forward EPS estimate",
                format_pct(Some(g))
            ),
            Some(g) => format!(
                "earnings growth {} vs {}",
                format_pct(Some(g)),
                format_pct(Some(threshold))
            ),
            None => "earnings growth estimate unavailable".to_string(),
        }
    };

    let high_growth_earnings = earnings_ok && growth_for_pass.map_or(false, |g| g > opts.high_growth_threshold);
    let beats_savings = earnings_ok && growth_for_pass.map_or(false, |g| g > opts.savings_rate);
    let high_growth_revenue = revenue.map_or(false, |g| g > opts.high_growth_threshold);
    let roe_pass = forward_roe.map_or(false, |r| r > opts.roe_threshold);

    let items = vec![
        ChecklistItem::new(
            FutureChecklistKey::HighGrowthEarnings,
            "High growth earnings",
            high_growth_earnings,
            growth_detail(opts.high_growth_threshold),
        ),
        ChecklistItem::new(
            FutureChecklistKey::HighGrowthRevenue,
            "High growth revenue",
            high_growth_revenue,
            match revenue {
                Some(g) => format!("revenue growth {}", format_pct(Some(g))),
                None => "revenue growth estimate unavailable".to_string(),
            },
        ),
        ChecklistItem::new(
            FutureChecklistKey::EarningsVsSavingsRate,
            "Earnings vs savings rate",
            beats_savings,
            growth_detail(opts.savings_rate),
        ),
        ChecklistItem::new(
            FutureChecklistKey::FutureRoe,
            "Future return on equity",
            roe_pass,
            match forward_roe {
                Some(r) => format!("forward ROE {}", format_pct(Some(r))),
                None => "current ROE or growth estimate unavailable".to_string(),
            },
        ),
    ];

    FutureChecklistResult {
        score: checklist_score(&items),
        items,
        as_of: as_of(quote),
        key_facts: FutureKeyFacts {
            earnings_growth: earnings,
            eps_growth: eps,
            growth_for_pass,
            growth_source,
            revenue_growth: revenue,
            forward_roe,
            forward_eps,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(raw: &str) -> QuoteSummary {
        QuoteSummary::from_json(raw).unwrap()
    }

    #[test]
    fn test_missing_quote_fails_all_four() {
        let result = compute_future_checklist(&QuoteSummary::default(), &FutureChecklistOptions::default());
        assert_eq!(result.items.len(), 4);
        assert_eq!(result.score, 0);
        assert_eq!(result.as_of, None);
    }

    #[test]
    fn test_growth_company_passes() {
        let q = quote(
            r#"{
            "financialData": { "returnOnEquity": 0.25, "mostRecentQuarter": "2024-06-30" },
            "earningsTrend": { "trend": [
                { "period": "0y", "endDate": "2024-12-31", "growth": 0.10,
                  "earningsEstimate": { "avg": 2.0 }, "revenueEstimate": { "growth": 0.15 } },
                { "period": "+1y", "endDate": "2025-12-31", "growth": 0.30,
                  "earningsEstimate": { "avg": 2.6, "yearAgoEps": 2.0 },
                  "epsTrend": { "current": 2.5 },
                  "revenueEstimate": { "growth": 0.22 } }
            ]}
        }"#,
        );
        let result = compute_future_checklist(&q, &FutureChecklistOptions::default());
        assert_eq!(result.as_of, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(result.key_facts.growth_source, Some(GrowthSource::EarningsGrowth));
        assert!((result.key_facts.eps_growth.unwrap() - 0.25).abs() < 1e-12);
        assert!((result.key_facts.forward_roe.unwrap() - 0.325).abs() < 1e-12);
        assert_eq!(result.score, 4);
    }

    #[test]
    fn test_loss_guard_blocks_earnings_items() {
        let q = quote(
            r#"{
            "earningsTrend": { "trend": [
                { "period": "+1y", "growth": 45.0, "earningsEstimate": { "avg": -0.4 } },
                { "period": "+2y", "earningsEstimate": { "avg": -0.1 } }
            ]}
        }"#,
        );
        let result = compute_future_checklist(&q, &FutureChecklistOptions::default());
        assert!((result.key_facts.earnings_growth.unwrap() - 0.45).abs() < 1e-12);
        assert!(!result.items[0].pass);
        assert!(!result.items[2].pass);
        assert!(result.items[0].detail.contains("non-positive"));
    }

    #[test]
    fn test_earnings_items_need_a_positive_forward_eps() {
        let q = quote(r#"{ "earningsTrend": { "trend": [ { "period": "+5y", "growth": 0.5 } ] } }"#);
        let result = compute_future_checklist(&q, &FutureChecklistOptions::default());
        assert!(result.key_facts.forward_eps.is_empty());
        assert!(!result.items[0].pass);
        assert!(!result.items[2].pass);
    }
}
