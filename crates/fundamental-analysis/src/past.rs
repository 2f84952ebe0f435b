//! Past-performance checklist over annual disclosures.

use analysis_core::{checklist_score, ChecklistItem, CompanyFacts, Fact};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::{format_money, format_pct};
use crate::growth::{cagr_over, pick_past_near_years};
use crate::series::{
    annual_series, annual_value_as_of, capex_series, equity_series, latest_as_of, net_income_series,
    operating_cash_flow_series, revenue_series,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PastChecklistKey {
    QualityOfEarnings,
    ImprovingMargins,
    EarningsTrend,
    AcceleratingGrowth,
    HighRoe,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PastChecklistOptions {
    pub roe_threshold: f64,
}

impl Default for PastChecklistOptions {
    fn default() -> Self {
        Self { roe_threshold: 0.15 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PastKeyFacts {
    pub net_margin_latest: Option<f64>,
    pub net_margin_prior: Option<f64>,
    pub revenue_yoy: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    pub net_income_cagr_5y: Option<f64>,
    pub roe: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub capex: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub net_income: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastChecklistResult {
    pub score: u32,
    pub items: Vec<ChecklistItem<PastChecklistKey>>,
    pub as_of: Option<NaiveDate>,
    pub key_facts: PastKeyFacts,
}

fn prior(annual: &[Fact]) -> Option<&Fact> {
    annual.len().checked_sub(2).map(|i| &annual[i])
}

fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

pub fn compute_past_checklist(facts: &CompanyFacts, opts: &PastChecklistOptions) -> PastChecklistResult {
    let revenue = revenue_series(facts);
    let net_income = net_income_series(facts);
    tracing::debug!(
        revenue = ?revenue.concept,
        net_income = ?net_income.concept,
        "past checklist series"
    );

    let revenue_annual = annual_series(&revenue.series);
    let ni_annual = annual_series(&net_income.series);

    let latest_rev = revenue_annual.last();
    let latest_ni = ni_annual.last();
    let prior_rev = prior(&revenue_annual);
    let prior_ni = prior(&ni_annual);
    let ni_val = latest_ni.map(|f| f.val);

    let as_of = latest_ni.or(latest_rev).map(|f| f.end);

    // Free cash flow at the net-income anchor. Capex is taken as reported,
    // so the usual negative outflow reduces operating cash flow.
    let ocf_pick = operating_cash_flow_series(facts);
    let capex_pick = capex_series(facts);
    let ocf = latest_ni.and_then(|ni| annual_value_as_of(&ocf_pick.series, ni.end)).map(|f| f.val);
    let capex = latest_ni.and_then(|ni| annual_value_as_of(&capex_pick.series, ni.end)).map(|f| f.val);
    let fcf = match (ocf, capex) {
        (Some(o), Some(c)) => Some(o + c),
        _ => None,
    };

    let quality_pass = matches!((ni_val, fcf), (Some(ni), Some(fcf)) if ni > 0.0 && fcf > ni);
    let quality_detail = match (ni_val, fcf) {
        (Some(ni), _) if ni <= 0.0 => format!("net income {} is a loss", format_money(Some(ni))),
        (Some(ni), Some(fcf)) => format!(
            "free cash flow {} vs net income {}",
            format_money(Some(fcf)),
            format_money(Some(ni))
        ),
        _ => "free cash flow or net income unavailable".to_string(),
    };

    let margin_latest = ratio(ni_val, latest_rev.map(|f| f.val));
    let margin_prior = ratio(prior_ni.map(|f| f.val), prior_rev.map(|f| f.val));
    let margins_pass = matches!((margin_latest, margin_prior), (Some(m), Some(p)) if m > 0.0 && m > p);
    let margins_detail = match (margin_latest, margin_prior) {
        (Some(m), Some(p)) => format!("net margin {} -> {}", format_pct(Some(p)), format_pct(Some(m))),
        _ => "year-over-year margin comparison unavailable".to_string(),
    };

    let ni_cagr_5y = latest_ni.and_then(|latest| cagr_over(&ni_annual, latest, 5.0));
    let profitable_last3 = ni_annual.iter().rev().take(3).filter(|f| f.val > 0.0).count();
    let trend_pass = ni_val.map_or(false, |ni| ni > 0.0)
        && match ni_cagr_5y {
            Some(cagr) => cagr > 0.0,
            None => profitable_last3 >= 2,
        };
    let trend_detail = match ni_cagr_5y {
        Some(cagr) => format!("net income 5y CAGR {}", format_pct(Some(cagr))),
        None => format!(
            "net income 5y CAGR not available; {} of last 3 years profitable",
            profitable_last3
        ),
    };

    let revenue_yoy = ratio(latest_rev.map(|f| f.val), prior_rev.map(|f| f.val)).map(|r| r - 1.0);
    let revenue_cagr_3y = latest_rev.and_then(|latest| cagr_over(&revenue_annual, latest, 3.0));
    let accelerating_pass = matches!((revenue_yoy, revenue_cagr_3y), (Some(y), Some(c)) if y > c);
    let accelerating_detail = match (revenue_yoy, revenue_cagr_3y) {
        (Some(y), Some(c)) => format!(
            "revenue YoY {} vs 3y CAGR {}",
            format_pct(Some(y)),
            format_pct(Some(c))
        ),
        _ => "revenue YoY or 3y CAGR unavailable".to_string(),
    };

    let equity = equity_series(facts);
    let roe = latest_ni.and_then(|ni| {
        let eq_latest = latest_as_of(&equity.series, ni.end)?;
        let eq_past = pick_past_near_years(&equity.series, eq_latest.end, 1.0)?;
        let avg = (eq_latest.val + eq_past.val) / 2.0;
        (avg != 0.0).then(|| ni.val / avg)
    });
    let roe_pass = roe.map_or(false, |r| r > opts.roe_threshold);
    let roe_detail = match roe {
        Some(r) => format!(
            "ROE {} (threshold {})",
            format_pct(Some(r)),
            format_pct(Some(opts.roe_threshold))
        ),
        None => "ROE unavailable (equity history missing)".to_string(),
    };

    let items = vec![
        ChecklistItem::new(
            PastChecklistKey::QualityOfEarnings,
            "Quality of earnings",
            quality_pass,
            quality_detail,
        ),
        ChecklistItem::new(
            PastChecklistKey::ImprovingMargins,
            "Improving profit margins",
            margins_pass,
            margins_detail,
        ),
        ChecklistItem::new(PastChecklistKey::EarningsTrend, "Earnings trend", trend_pass, trend_detail),
        ChecklistItem::new(
            PastChecklistKey::AcceleratingGrowth,
            "Accelerating growth",
            accelerating_pass,
            accelerating_detail,
        ),
        ChecklistItem::new(PastChecklistKey::HighRoe, "High return on equity", roe_pass, roe_detail),
    ];

    PastChecklistResult {
        score: checklist_score(&items),
        items,
        as_of,
        key_facts: PastKeyFacts {
            net_margin_latest: margin_latest,
            net_margin_prior: margin_prior,
            revenue_yoy,
            revenue_cagr_3y,
            net_income_cagr_5y: ni_cagr_5y,
            roe,
            operating_cash_flow: ocf,
            capex,
            free_cash_flow: fcf,
            net_income: ni_val,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{annual_fact, d, facts_with};
    use analysis_core::Taxonomy;

    #[test]
    fn test_empty_payload_fails_all_five() {
        let result = compute_past_checklist(&CompanyFacts::default(), &PastChecklistOptions::default());
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.score, 0);
        assert_eq!(result.as_of, None);
        assert!(result.items.iter().all(|item| !item.pass && !item.detail.is_empty()));
    }

    #[test]
    fn test_quality_of_earnings_uses_ocf_plus_capex() {
        let facts = facts_with(&[
            (Taxonomy::UsGaap, "NetIncomeLoss", vec![annual_fact(2023, 100.0)]),
            (
                Taxonomy::UsGaap,
                "NetCashProvidedByUsedInOperatingActivities",
                vec![annual_fact(2023, 180.0)],
            ),
            (
                Taxonomy::UsGaap,
                "PaymentsToAcquirePropertyPlantAndEquipment",
                vec![annual_fact(2023, -50.0)],
            ),
        ]);
        let result = compute_past_checklist(&facts, &PastChecklistOptions::default());
        let item = &result.items[0];
        assert_eq!(item.key, PastChecklistKey::QualityOfEarnings);
        assert!(item.pass);
        assert_eq!(result.key_facts.free_cash_flow, Some(130.0));
        assert_eq!(result.as_of, Some(d(2023, 12, 31)));
    }

    #[test]
    fn test_roe_against_average_equity() {
        let facts = facts_with(&[
            (Taxonomy::UsGaap, "NetIncomeLoss", vec![annual_fact(2023, 20.0)]),
            (
                Taxonomy::UsGaap,
                "StockholdersEquity",
                vec![
                    Fact::new(d(2022, 9, 30), 90.0).with_form("10-Q"),
                    Fact::new(d(2023, 12, 31), 110.0).with_form("10-K"),
                ],
            ),
        ]);
        let result = compute_past_checklist(&facts, &PastChecklistOptions::default());
        assert!((result.key_facts.roe.unwrap() - 0.2).abs() < 1e-12);
        assert!(result.items[4].pass);

        let strict = PastChecklistOptions { roe_threshold: 0.25 };
        assert!(!compute_past_checklist(&facts, &strict).items[4].pass);
    }
}
