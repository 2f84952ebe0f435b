//! Headline metrics: TTM revenue and earnings, margin, ROE and 5y growth.

use analysis_core::{CompanyFacts, Fact, GrowthResult, TtmObservation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::{format_growth, format_money, format_pct};
use crate::growth::{
    cagr_over, compound_growth, growth_over_horizon, pick_past_near_years, years_between, DEFAULT_HORIZON_YEARS,
};
use crate::series::{
    annual_series, eps_series, equity_series, latest_as_of, net_income_series, revenue_series, weighted_shares_series,
};
use crate::ttm::{compute_ttm, latest_annual};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    pub ttm_revenue: String,
    pub ttm_net_income: String,
    pub net_margin: String,
    pub roe: String,
    pub revenue_cagr_5y: String,
    pub net_income_growth_5y: String,
    pub eps_growth_5y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub recent_end: NaiveDate,
    pub revenue: TtmObservation,
    pub net_income: TtmObservation,
    pub net_margin: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_cagr_5y: Option<f64>,
    pub net_income_cagr_5y: Option<f64>,
    pub eps_cagr_5y: Option<f64>,
    pub net_income_growth_5y: GrowthResult,
    pub eps_growth_5y: GrowthResult,
    pub display: SummaryDisplay,
}

fn cagr_of_latest(annual: &[Fact]) -> Option<f64> {
    annual.last().and_then(|latest| cagr_over(annual, latest, DEFAULT_HORIZON_YEARS))
}

/// EPS CAGR from tagged EPS, or net income over weighted shares when the
/// filer reports no EPS.
fn eps_cagr(facts: &CompanyFacts, eps: &[Fact], ni_annual: &[Fact]) -> Option<f64> {
    let eps_annual = annual_series(eps);
    if !eps_annual.is_empty() {
        return cagr_of_latest(&eps_annual);
    }

    let shares = annual_series(&weighted_shares_series(facts).series);
    let latest_ni = ni_annual.last()?;
    let latest_sh = shares
        .iter()
        .rev()
        .find(|f| f.end == latest_ni.end)
        .or_else(|| shares.last())?;
    let past_ni = pick_past_near_years(ni_annual, latest_ni.end, DEFAULT_HORIZON_YEARS)?;
    let past_sh = shares.iter().rev().find(|f| f.end == past_ni.end)?;
    if latest_sh.val == 0.0 || past_sh.val == 0.0 {
        return None;
    }
    compound_growth(
        past_ni.val / past_sh.val,
        latest_ni.val / latest_sh.val,
        years_between(past_ni.end, latest_ni.end),
    )
}

/// `None` when revenue or net income cannot be established at all.
pub fn compute_summary_metrics(facts: &CompanyFacts) -> Option<SummaryMetrics> {
    let revenue = revenue_series(facts);
    let net_income = net_income_series(facts);
    if revenue.is_empty() || net_income.is_empty() {
        return None;
    }

    // TTM for both, else the latest full year for both.
    let (rev, ni) = match (compute_ttm(&revenue.series), compute_ttm(&net_income.series)) {
        (Some(rev), Some(ni)) => (rev, ni),
        _ => {
            tracing::debug!("summary metrics fall back to latest annual figures");
            (latest_annual(&revenue.series)?, latest_annual(&net_income.series)?)
        }
    };
    let recent_end = ni.end;

    let net_margin = (rev.value != 0.0).then(|| ni.value / rev.value);

    let equity = equity_series(facts);
    let roe = latest_as_of(&equity.series, recent_end).and_then(|eq_latest| {
        let eq_past = pick_past_near_years(&equity.series, eq_latest.end, 1.0)?;
        let avg = (eq_latest.val + eq_past.val) / 2.0;
        (avg != 0.0).then(|| ni.value / avg)
    });

    let revenue_annual = annual_series(&revenue.series);
    let ni_annual = annual_series(&net_income.series);
    let revenue_cagr_5y = cagr_of_latest(&revenue_annual);
    let net_income_cagr_5y = cagr_of_latest(&ni_annual);

    let eps = eps_series(facts);
    let eps_cagr_5y = eps_cagr(facts, &eps.series, &ni_annual);

    let latest_ni_end = ni_annual.last().map(|f| f.end);
    let net_income_growth_5y = match latest_ni_end {
        Some(end) => growth_over_horizon(&net_income.series, end, DEFAULT_HORIZON_YEARS),
        None => GrowthResult::not_available("no annual net income"),
    };
    let eps_growth_5y = match latest_ni_end.or_else(|| eps.series.last().map(|f| f.end)) {
        Some(end) if !eps.is_empty() => growth_over_horizon(&eps.series, end, DEFAULT_HORIZON_YEARS),
        _ => GrowthResult::not_available("no EPS series"),
    };

    let display = SummaryDisplay {
        ttm_revenue: format_money(Some(rev.value)),
        ttm_net_income: format_money(Some(ni.value)),
        net_margin: format_pct(net_margin),
        roe: format_pct(roe),
        revenue_cagr_5y: format_pct(revenue_cagr_5y),
        net_income_growth_5y: format_growth(&net_income_growth_5y),
        eps_growth_5y: format_growth(&eps_growth_5y),
    };

    Some(SummaryMetrics {
        recent_end,
        revenue: rev,
        net_income: ni,
        net_margin,
        roe,
        revenue_cagr_5y,
        net_income_cagr_5y,
        eps_cagr_5y,
        net_income_growth_5y,
        eps_growth_5y,
        display,
    })
}
