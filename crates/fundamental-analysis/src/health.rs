//! Financial-health checklist: liquidity, leverage and interest coverage.

use analysis_core::{checklist_score, ChecklistItem, CompanyFacts, QuoteSummary, Taxonomy};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::concepts;
use crate::format::{format_money, format_pct, format_ratio};
use crate::growth::pick_past_near_years;
use crate::series::{
    annual_series, balance_value_as_of, latest_balance_end, pick_unit_series_with_currency_fallback,
    statement_series,
};
use crate::ttm::compute_ttm;

static DEBT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(Debt|Borrow|Borrowings|NotesPayable|NotePayable|Convertible|Loan|CreditFacility|TermLoan|SeniorNotes|LeaseObligation|CapitalLease|FinanceLease)",
    )
    .expect("debt concept pattern")
});

/// Investment holdings whose names look like debt.
static NOT_DEBT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(DebtSecurities|DebtSecurity|DebtInstrument|DebtMaturity|AvailableForSale|TradingSecurities|MarketableSecurities)",
    )
    .expect("debt exclusion pattern")
});

/// Discovered candidates above this multiple of total liabilities are ignored.
const DISCOVERY_CAP_MULTIPLE: f64 = 2.0;

/// Liabilities-to-equity must fall below this share of its 5y-ago level.
const DEBT_REDUCTION_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthChecklistKey {
    ShortTerm,
    LongTerm,
    DebtLevel,
    DebtReduction,
    InterestCoverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthChecklistOptions {
    pub net_debt_to_equity_threshold: f64,
    pub interest_coverage_threshold: f64,
}

impl Default for HealthChecklistOptions {
    fn default() -> Self {
        Self {
            net_debt_to_equity_threshold: 0.40,
            interest_coverage_threshold: 2.0,
        }
    }
}

/// How the total-debt figure was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DebtSource {
    /// A single tag that already represents total debt.
    Tagged { taxonomy: Taxonomy, concept: String },
    /// Current and non-current parts summed.
    Combined {
        taxonomy: Taxonomy,
        current: String,
        noncurrent: String,
    },
    /// Largest debt-like concept found by name scan. Heuristic.
    Discovered { taxonomy: Taxonomy, concept: String },
    /// Market-data provider's total debt.
    Quote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPick {
    pub value: f64,
    pub source: DebtSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CashSource {
    CashAndShortTermInvestments,
    CashOnly,
    Quote,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthKeyFacts {
    pub debt_to_equity: Option<f64>,
    pub net_debt_to_equity: Option<f64>,
    pub debt: Option<f64>,
    pub debt_source: Option<DebtSource>,
    pub cash: Option<f64>,
    pub cash_source: Option<CashSource>,
    pub equity: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub non_current_assets: Option<f64>,
    pub non_current_liabilities: Option<f64>,
    pub liabilities_5y_ago: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthChecklistResult {
    pub score: u32,
    pub items: Vec<ChecklistItem<HealthChecklistKey>>,
    pub as_of: Option<NaiveDate>,
    pub key_facts: HealthKeyFacts,
}

fn value_as_of(facts: &CompanyFacts, taxonomy: Taxonomy, concept: &str, as_of: NaiveDate) -> Option<f64> {
    let series = pick_unit_series_with_currency_fallback(facts, taxonomy, concept, &[]);
    balance_value_as_of(&series, as_of)
}

fn cash_as_of(facts: &CompanyFacts, as_of: NaiveDate) -> Option<(f64, CashSource)> {
    let direct = statement_series(facts, concepts::CASH_AND_SHORT_TERM);
    if let Some(v) = balance_value_as_of(&direct.series, as_of) {
        return Some((v, CashSource::CashAndShortTermInvestments));
    }
    let cash_only = statement_series(facts, concepts::CASH_ONLY);
    balance_value_as_of(&cash_only.series, as_of).map(|v| (v, CashSource::CashOnly))
}

/// Total debt as of `as_of`: fixed total-debt tags, then current plus
/// non-current pairs, then a scan of every debt-like concept. `cap_hint`
/// (usually total liabilities) bounds the scan.
pub fn pick_total_debt(facts: &CompanyFacts, as_of: NaiveDate, cap_hint: Option<f64>) -> Option<DebtPick> {
    let fixed = concepts::DEBT_US_GAAP
        .iter()
        .map(|c| (Taxonomy::UsGaap, *c))
        .chain(concepts::DEBT_IFRS.iter().map(|c| (Taxonomy::IfrsFull, *c)));
    for (taxonomy, concept) in fixed {
        if let Some(v) = value_as_of(facts, taxonomy, concept, as_of) {
            return Some(DebtPick {
                value: v.abs(),
                source: DebtSource::Tagged {
                    taxonomy,
                    concept: concept.to_string(),
                },
            });
        }
    }

    let combos = concepts::DEBT_COMBOS
        .iter()
        .map(|pair| (Taxonomy::UsGaap, pair))
        .chain(concepts::DEBT_COMBOS_IFRS.iter().map(|pair| (Taxonomy::IfrsFull, pair)));
    for (taxonomy, (current, noncurrent)) in combos {
        let a = value_as_of(facts, taxonomy, current, as_of);
        let b = value_as_of(facts, taxonomy, noncurrent, as_of);
        if let (Some(a), Some(b)) = (a, b) {
            return Some(DebtPick {
                value: a.abs() + b.abs(),
                source: DebtSource::Combined {
                    taxonomy,
                    current: current.to_string(),
                    noncurrent: noncurrent.to_string(),
                },
            });
        }
    }

    discover_debt(facts, as_of, cap_hint)
}

fn discover_debt(facts: &CompanyFacts, as_of: NaiveDate, cap_hint: Option<f64>) -> Option<DebtPick> {
    let cap = cap_hint
        .filter(|c| c.is_finite())
        .map(|c| c * DISCOVERY_CAP_MULTIPLE);

    let mut best: Option<(f64, Taxonomy, &str)> = None;
    for taxonomy in Taxonomy::ALL {
        for (concept, _) in facts.concepts(taxonomy) {
            if !DEBT_NAME.is_match(concept) || NOT_DEBT_NAME.is_match(concept) {
                continue;
            }
            let Some(abs) = value_as_of(facts, taxonomy, concept, as_of).map(f64::abs) else {
                continue;
            };
            if !(abs > 0.0) || cap.map_or(false, |cap| abs > cap) {
                continue;
            }
            // Ties go to the later candidate.
            if best.map_or(true, |(v, _, _)| abs >= v) {
                best = Some((abs, taxonomy, concept));
            }
        }
    }

    let (value, taxonomy, concept) = best?;
    tracing::warn!(
        taxonomy = %taxonomy,
        concept,
        value,
        "total debt taken from discovered concept"
    );
    Some(DebtPick {
        value,
        source: DebtSource::Discovered {
            taxonomy,
            concept: concept.to_string(),
        },
    })
}

/// TTM EBIT over TTM interest expense. Net-interest concepts are
/// income-signed, so they are negated into an expense first. The sign of
/// the multiple is kept: a loss, or net interest income, fails the check.
fn coverage_from_facts(facts: &CompanyFacts) -> Option<f64> {
    let ebit = compute_ttm(&statement_series(facts, concepts::EBIT).series)?;
    let expense = compute_ttm(&statement_series(facts, concepts::NET_INTEREST).series)
        .map(|obs| -obs.value)
        .filter(|v| *v != 0.0)
        .or_else(|| {
            compute_ttm(&statement_series(facts, concepts::INTEREST_EXPENSE).series)
                .map(|obs| obs.value)
                .filter(|v| *v != 0.0)
        })?;
    Some(ebit.value / expense)
}

fn coverage_from_quote(quote: &QuoteSummary) -> Option<f64> {
    if let Some(fd) = quote.financial_data.as_ref() {
        let ebit = fd.ebitda.or(fd.ebit).or(fd.operating_income);
        if let (Some(ebit), Some(interest)) = (ebit, fd.interest_expense) {
            if interest != 0.0 {
                return Some(ebit / interest);
            }
        }
    }

    let rows = quote.quarterly_income_statements();
    let last4 = &rows[rows.len().saturating_sub(4)..];
    let ebit: Vec<f64> = last4.iter().filter_map(|r| r.ebit.or(r.operating_income)).collect();
    let interest: Vec<f64> = last4.iter().filter_map(|r| r.interest_expense).collect();
    if ebit.is_empty() || interest.is_empty() {
        return None;
    }
    let interest_sum: f64 = interest.iter().sum();
    (interest_sum != 0.0).then(|| ebit.iter().sum::<f64>() / interest_sum)
}

fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

pub fn compute_financial_health(
    facts: &CompanyFacts,
    quote: Option<&QuoteSummary>,
    opts: &HealthChecklistOptions,
) -> HealthChecklistResult {
    let assets = statement_series(facts, concepts::ASSETS);
    let liabilities = statement_series(facts, concepts::LIABILITIES);
    let equity_pick = statement_series(facts, concepts::EQUITY);
    let current_assets_pick = statement_series(facts, concepts::CURRENT_ASSETS);
    let current_liabilities_pick = statement_series(facts, concepts::CURRENT_LIABILITIES);
    let noncurrent_liabilities_pick = statement_series(facts, concepts::NONCURRENT_LIABILITIES);

    let as_of = [
        &current_assets_pick,
        &current_liabilities_pick,
        &equity_pick,
        &assets,
        &liabilities,
    ]
    .iter()
    .find_map(|pick| latest_balance_end(&pick.series));

    let at = |series: &[analysis_core::Fact]| as_of.and_then(|end| balance_value_as_of(series, end));
    let mut total_assets = at(&assets.series);
    let mut total_liabilities = at(&liabilities.series);
    let mut equity = at(&equity_pick.series);
    let current_assets = at(&current_assets_pick.series);
    let current_liabilities = at(&current_liabilities_pick.series);
    let noncurrent_liabilities = at(&noncurrent_liabilities_pick.series);

    let non_current_assets = match (total_assets, current_assets) {
        (Some(t), Some(c)) => Some(t - c),
        _ => None,
    };

    let (mut cash, mut cash_source) = match as_of.and_then(|end| cash_as_of(facts, end)) {
        Some((v, source)) => (Some(v), Some(source)),
        None => (None, None),
    };
    let debt_pick = as_of.and_then(|end| pick_total_debt(facts, end, total_liabilities));
    let mut debt = debt_pick.as_ref().map(|p| p.value);
    let mut debt_source = debt_pick.map(|p| p.source);

    let mut interest_coverage = coverage_from_facts(facts);

    if let Some(quote) = quote {
        let fd = quote.financial_data.as_ref();
        let bs = quote.latest_balance_sheet();

        let quote_debt = fd
            .and_then(|f| f.total_debt)
            .or_else(|| bs.and_then(|b| b.total_debt))
            .or_else(|| bs.and_then(|b| b.short_long_term_debt_total));
        if let Some(v) = quote_debt {
            debt = Some(v);
            debt_source = Some(DebtSource::Quote);
        }

        let quote_cash = fd
            .and_then(|f| f.total_cash)
            .or_else(|| bs.and_then(|b| b.cash_and_short_term_investments))
            .or_else(|| bs.and_then(|b| b.cash));
        if let Some(v) = quote_cash {
            cash = Some(v);
            cash_source = Some(CashSource::Quote);
        }

        let quote_assets = bs.and_then(|b| b.total_assets);
        let quote_liabilities = bs.and_then(|b| b.total_liab);
        if quote_assets.is_some() {
            total_assets = quote_assets;
        }
        if quote_liabilities.is_some() {
            total_liabilities = quote_liabilities;
        }
        if let (Some(a), Some(l)) = (quote_assets, quote_liabilities) {
            equity = Some(a - l);
        }

        if interest_coverage.is_none() {
            interest_coverage = coverage_from_quote(quote);
            if interest_coverage.is_some() {
                tracing::debug!("interest coverage from quote summary");
            }
        }
    }

    let debt_to_equity = ratio(debt, equity);
    let net_debt_to_equity = match (debt, cash) {
        (Some(d), Some(c)) => ratio(Some(d - c), equity),
        _ => None,
    };

    // Liabilities trend over five years, on annual figures only.
    let mut liabilities_5y_ago = None;
    let mut debt_reduction_pass = false;
    if let (Some(end), false) = (as_of, liabilities.is_empty()) {
        let past_liab = pick_past_near_years(&annual_series(&liabilities.series), end, 5.0).cloned();
        let past_equity = pick_past_near_years(&annual_series(&equity_pick.series), end, 5.0).cloned();

        if let Some(past) = past_liab.as_ref() {
            liabilities_5y_ago = Some(past.val);
            if let Some(now) = total_liabilities {
                debt_reduction_pass = now < past.val;
            }
        }

        let current_ratio = ratio(total_liabilities, equity).or(debt_to_equity);
        let past_ratio = match (past_liab.as_ref(), past_equity.as_ref()) {
            (Some(l), Some(e)) => ratio(Some(l.val), Some(e.val)),
            _ => None,
        };
        if let (Some(now), Some(then)) = (current_ratio, past_ratio) {
            if now.is_finite() && then.is_finite() && now < then * DEBT_REDUCTION_RATIO {
                debt_reduction_pass = true;
            }
        }
    }

    let short_term_pass = matches!((current_assets, current_liabilities), (Some(a), Some(l)) if a > l);

    let approx_ncl = noncurrent_liabilities.or_else(|| match (total_liabilities, current_liabilities) {
        (Some(t), Some(c)) => Some(t - c),
        _ => None,
    });
    let long_term_pass = match (current_assets, approx_ncl, non_current_assets) {
        (Some(ca), Some(ncl), _) => ca > ncl,
        (None, Some(ncl), Some(nca)) => nca > ncl,
        _ => false,
    };

    let debt_level_pass = net_debt_to_equity.map_or(false, |r| r < opts.net_debt_to_equity_threshold);
    let coverage_pass = interest_coverage.map_or(false, |c| c >= opts.interest_coverage_threshold);

    let items = vec![
        ChecklistItem::new(
            HealthChecklistKey::ShortTerm,
            "Short-term liabilities",
            short_term_pass,
            match (current_assets, current_liabilities) {
                (Some(a), Some(l)) => format!(
                    "current assets {} vs current liabilities {}",
                    format_money(Some(a)),
                    format_money(Some(l))
                ),
                _ => "current assets or liabilities unavailable".to_string(),
            },
        ),
        ChecklistItem::new(
            HealthChecklistKey::LongTerm,
            "Long-term liabilities",
            long_term_pass,
            match (current_assets, approx_ncl) {
                (Some(a), Some(l)) => format!(
                    "current assets {} vs non-current liabilities {}",
                    format_money(Some(a)),
                    format_money(Some(l))
                ),
                (None, Some(l)) if non_current_assets.is_some() => format!(
                    "non-current assets {} vs non-current liabilities {}",
                    format_money(non_current_assets),
                    format_money(Some(l))
                ),
                _ => "non-current liabilities unavailable".to_string(),
            },
        ),
        ChecklistItem::new(
            HealthChecklistKey::DebtLevel,
            "Debt level",
            debt_level_pass,
            match net_debt_to_equity {
                Some(r) => format!(
                    "net debt to equity {} (threshold < {})",
                    format_pct(Some(r)),
                    format_pct(Some(opts.net_debt_to_equity_threshold))
                ),
                None => "net debt to equity unavailable (debt, cash or equity missing)".to_string(),
            },
        ),
        ChecklistItem::new(
            HealthChecklistKey::DebtReduction,
            "Debt reduction",
            debt_reduction_pass,
            match (liabilities_5y_ago, total_liabilities) {
                (Some(then), Some(now)) => format!(
                    "total liabilities {} -> {} over 5y",
                    format_money(Some(then)),
                    format_money(Some(now))
                ),
                _ => "no liabilities figure from 5 years ago".to_string(),
            },
        ),
        ChecklistItem::new(
            HealthChecklistKey::InterestCoverage,
            "Interest coverage",
            coverage_pass,
            match interest_coverage {
                Some(c) => format!(
                    "{} (threshold >= {})",
                    format_ratio(Some(c)),
                    format_ratio(Some(opts.interest_coverage_threshold))
                ),
                None => "EBIT or interest unavailable".to_string(),
            },
        ),
    ];

    HealthChecklistResult {
        score: checklist_score(&items),
        items,
        as_of,
        key_facts: HealthKeyFacts {
            debt_to_equity,
            net_debt_to_equity,
            debt,
            debt_source,
            cash,
            cash_source,
            equity,
            total_assets,
            total_liabilities,
            interest_coverage,
            current_assets,
            current_liabilities,
            non_current_assets,
            non_current_liabilities: noncurrent_liabilities,
            liabilities_5y_ago,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{balance_fact, d, facts_with, quarter_fact};

    fn quarters(per_quarter: f64) -> Vec<analysis_core::Fact> {
        (1..=4).map(|q| quarter_fact(2023, q, per_quarter)).collect()
    }

    fn coverage_of(entries: &[(Taxonomy, &str, Vec<analysis_core::Fact>)], quote: Option<&QuoteSummary>) -> HealthChecklistResult {
        compute_financial_health(&facts_with(entries), quote, &HealthChecklistOptions::default())
    }

    #[test]
    fn test_empty_payload_fails_all_five() {
        let result = compute_financial_health(&CompanyFacts::default(), None, &HealthChecklistOptions::default());
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.score, 0);
        assert_eq!(result.as_of, None);
    }

    #[test]
    fn test_fixed_tag_wins_over_discovery() {
        let end = d(2024, 3, 31);
        let facts = facts_with(&[
            (Taxonomy::UsGaap, "LongTermDebt", vec![balance_fact(end, -300.0, "10-Q")]),
            (Taxonomy::UsGaap, "OtherLoansPayable", vec![balance_fact(end, 900.0, "10-Q")]),
        ]);
        let pick = pick_total_debt(&facts, end, Some(1000.0)).unwrap();
        assert_eq!(pick.value, 300.0);
        assert!(matches!(pick.source, DebtSource::Tagged { ref concept, .. } if concept == "LongTermDebt"));
    }

    #[test]
    fn test_combined_current_and_noncurrent() {
        let end = d(2024, 3, 31);
        let facts = facts_with(&[
            (
                Taxonomy::UsGaap,
                "LongTermDebtAndFinanceLeaseLiabilitiesCurrent",
                vec![balance_fact(end, 40.0, "10-Q")],
            ),
            (
                Taxonomy::UsGaap,
                "LongTermDebtAndFinanceLeaseLiabilitiesNoncurrent",
                vec![balance_fact(end, 160.0, "10-Q")],
            ),
        ]);
        let pick = pick_total_debt(&facts, end, None).unwrap();
        assert_eq!(pick.value, 200.0);
        assert!(matches!(pick.source, DebtSource::Combined { .. }));
    }

    #[test]
    fn test_discovery_respects_cap_and_exclusions() {
        let end = d(2024, 3, 31);
        let facts = facts_with(&[
            (Taxonomy::UsGaap, "SeniorNotesDue2030", vec![balance_fact(end, 500.0, "10-Q")]),
            (Taxonomy::UsGaap, "TermLoanFacility", vec![balance_fact(end, 5000.0, "10-Q")]),
            (
                Taxonomy::UsGaap,
                "AvailableForSaleSecuritiesDebtSecurities",
                vec![balance_fact(end, 800.0, "10-Q")],
            ),
        ]);
        let pick = pick_total_debt(&facts, end, Some(1000.0)).unwrap();
        assert_eq!(pick.value, 500.0);
        assert_eq!(
            pick.source,
            DebtSource::Discovered {
                taxonomy: Taxonomy::UsGaap,
                concept: "SeniorNotesDue2030".to_string(),
            }
        );

        let uncapped = pick_total_debt(&facts, end, None).unwrap();
        assert_eq!(uncapped.value, 5000.0);
    }

    #[test]
    fn test_quote_overrides_debt_and_recomputes_equity() {
        let end = d(2024, 3, 31);
        let facts = facts_with(&[
            (Taxonomy::UsGaap, "StockholdersEquity", vec![balance_fact(end, 1000.0, "10-Q")]),
            (Taxonomy::UsGaap, "LongTermDebt", vec![balance_fact(end, 300.0, "10-Q")]),
        ]);
        let quote = QuoteSummary::from_json(
            r#"{
                "financialData": { "totalDebt": 400.0, "totalCash": 100.0 },
                "balanceSheetHistoryQuarterly": { "balanceSheetStatements": [
                    { "endDate": "2024-03-31", "totalAssets": 2000.0, "totalLiab": 1200.0 }
                ]}
            }"#,
        )
        .unwrap();
        let result = compute_financial_health(&facts, Some(&quote), &HealthChecklistOptions::default());
        let kf = &result.key_facts;
        assert_eq!(kf.debt, Some(400.0));
        assert_eq!(kf.debt_source, Some(DebtSource::Quote));
        assert_eq!(kf.equity, Some(800.0));
        assert!((kf.net_debt_to_equity.unwrap() - 300.0 / 800.0).abs() < 1e-12);
        assert!(result.items[2].pass);
    }

    #[test]
    fn test_discovery_tie_keeps_later_concept() {
        let end = d(2024, 3, 31);
        let facts = facts_with(&[
            (Taxonomy::UsGaap, "BankLoansPayable", vec![balance_fact(end, 500.0, "10-Q")]),
            (Taxonomy::UsGaap, "TermLoanPayable", vec![balance_fact(end, 500.0, "10-Q")]),
        ]);
        let pick = pick_total_debt(&facts, end, None).unwrap();
        assert_eq!(
            pick.source,
            DebtSource::Discovered {
                taxonomy: Taxonomy::UsGaap,
                concept: "TermLoanPayable".to_string(),
            }
        );
    }

    #[test]
    fn test_coverage_negates_net_interest() {
        // 1000 EBIT against 50 of net interest paid
        let result = coverage_of(
            &[
                (Taxonomy::UsGaap, "OperatingIncomeLoss", quarters(250.0)),
                (Taxonomy::UsGaap, "InterestIncomeExpenseNet", quarters(-12.5)),
            ],
            None,
        );
        assert!((result.key_facts.interest_coverage.unwrap() - 20.0).abs() < 1e-9);
        assert!(result.items[4].pass);
    }

    #[test]
    fn test_coverage_of_operating_loss_fails() {
        let result = coverage_of(
            &[
                (Taxonomy::UsGaap, "OperatingIncomeLoss", quarters(-25.0)),
                (Taxonomy::UsGaap, "InterestIncomeExpenseNet", quarters(-12.5)),
            ],
            None,
        );
        assert!((result.key_facts.interest_coverage.unwrap() + 2.0).abs() < 1e-9);
        assert!(!result.items[4].pass);
    }

    #[test]
    fn test_coverage_with_net_interest_income_is_negative() {
        let result = coverage_of(
            &[
                (Taxonomy::UsGaap, "OperatingIncomeLoss", quarters(250.0)),
                (Taxonomy::UsGaap, "InterestIncomeExpenseNet", quarters(12.5)),
            ],
            None,
        );
        assert!((result.key_facts.interest_coverage.unwrap() + 20.0).abs() < 1e-9);
        assert!(!result.items[4].pass);
    }

    #[test]
    fn test_coverage_falls_back_to_interest_expense() {
        // zero net interest is skipped
        let result = coverage_of(
            &[
                (Taxonomy::UsGaap, "OperatingIncomeLoss", quarters(250.0)),
                (Taxonomy::UsGaap, "InterestIncomeExpenseNet", quarters(0.0)),
                (Taxonomy::UsGaap, "InterestExpense", quarters(100.0)),
            ],
            None,
        );
        assert!((result.key_facts.interest_coverage.unwrap() - 2.5).abs() < 1e-9);
        assert!(result.items[4].pass);
    }

    #[test]
    fn test_coverage_zero_denominator_is_unavailable() {
        let entries = [
            (Taxonomy::UsGaap, "OperatingIncomeLoss", quarters(250.0)),
            (Taxonomy::UsGaap, "InterestExpense", quarters(0.0)),
        ];
        let result = coverage_of(&entries, None);
        assert_eq!(result.key_facts.interest_coverage, None);
        assert!(!result.items[4].pass);

        let quote = QuoteSummary::from_json(r#"{ "financialData": { "ebitda": 300.0, "interestExpense": 100.0 } }"#)
            .unwrap();
        let result = coverage_of(&entries, Some(&quote));
        assert!((result.key_facts.interest_coverage.unwrap() - 3.0).abs() < 1e-12);
        assert!(result.items[4].pass);
    }
}
