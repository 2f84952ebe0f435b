//! Turning the raw facts payload into clean concept series.
//!
//! A series is a `Vec<Fact>` sorted strictly ascending by `end`, one fact per
//! `end`. Every picker here returns an empty series when nothing matches; none
//! of them fail.

use std::collections::BTreeMap;

use analysis_core::{CompanyFacts, Fact, FiscalPeriod, Taxonomy, ANNUAL_FORMS, QUARTERLY_FORMS};
use chrono::NaiveDate;
use serde::Serialize;

use crate::concepts::{self, FALLBACK_CURRENCY_UNITS};
use crate::period::is_annual_like;

/// Forms whose facts carry point-in-time balances worth reading.
pub const BALANCE_SHEET_FORMS: &[&str] = &[
    "10-Q", "10-Q/A", "10-K", "10-K/A", "20-F", "20-F/A", "40-F", "6-K",
];

/// Collapses restatements: for each `end` the fact with the latest `filed`
/// date survives (a missing `filed` ranks oldest, equal dates keep the later
/// input).
pub fn normalize_facts(facts: &[Fact]) -> Vec<Fact> {
    let mut by_end: BTreeMap<NaiveDate, &Fact> = BTreeMap::new();
    for fact in facts {
        match by_end.get(&fact.end) {
            Some(prev) if fact.filed < prev.filed => {}
            _ => {
                by_end.insert(fact.end, fact);
            }
        }
    }
    by_end.into_values().cloned().collect()
}

/// First preferred unit with a non-empty fact list, normalized.
pub fn pick_unit_series(
    facts: &CompanyFacts,
    taxonomy: Taxonomy,
    concept: &str,
    preferred_units: &[&str],
) -> Vec<Fact> {
    let Some(concept_facts) = facts.concept(taxonomy, concept) else {
        return Vec::new();
    };
    preferred_units
        .iter()
        .filter_map(|unit| concept_facts.units.get(*unit))
        .find(|list| !list.is_empty())
        .map(|list| normalize_facts(list))
        .unwrap_or_default()
}

/// Like [`pick_unit_series`], then walks the fixed currency list.
pub fn pick_unit_series_with_currency_fallback(
    facts: &CompanyFacts,
    taxonomy: Taxonomy,
    concept: &str,
    preferred_units: &[&str],
) -> Vec<Fact> {
    let series = pick_unit_series(facts, taxonomy, concept, preferred_units);
    if !series.is_empty() {
        return series;
    }
    pick_unit_series(facts, taxonomy, concept, FALLBACK_CURRENCY_UNITS)
}

/// One attempt in a concept lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConceptLookup {
    pub taxonomy: Taxonomy,
    pub concept: &'static str,
    pub units: &'static [&'static str],
}

impl ConceptLookup {
    pub fn new(taxonomy: Taxonomy, concept: &'static str, units: &'static [&'static str]) -> Self {
        Self {
            taxonomy,
            concept,
            units,
        }
    }

    /// Every concept under us-gaap, then every concept under ifrs-full.
    pub fn us_gaap_then_ifrs(
        concepts: &'static [&'static str],
        units: &'static [&'static str],
    ) -> Vec<Self> {
        Taxonomy::ALL
            .into_iter()
            .flat_map(|taxonomy| concepts.iter().map(move |c| Self::new(taxonomy, *c, units)))
            .collect()
    }

    /// For each concept: us-gaap, then ifrs-full.
    pub fn per_concept_both_taxonomies(
        concepts: &'static [&'static str],
        us_units: &'static [&'static str],
        ifrs_units: &'static [&'static str],
    ) -> Vec<Self> {
        concepts
            .iter()
            .flat_map(|c| {
                [
                    Self::new(Taxonomy::UsGaap, *c, us_units),
                    Self::new(Taxonomy::IfrsFull, *c, ifrs_units),
                ]
            })
            .collect()
    }
}

/// Which concept a series came from. `concept` is `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesPick {
    pub taxonomy: Option<Taxonomy>,
    pub concept: Option<String>,
    pub series: Vec<Fact>,
}

impl SeriesPick {
    fn found(taxonomy: Taxonomy, concept: &str, series: Vec<Fact>) -> Self {
        Self {
            taxonomy: Some(taxonomy),
            concept: Some(concept.to_string()),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Runs the lookups in order and stops at the first non-empty series.
pub fn first_series(facts: &CompanyFacts, lookups: &[ConceptLookup]) -> SeriesPick {
    lookups
        .iter()
        .find_map(|lookup| {
            let series = pick_unit_series_with_currency_fallback(
                facts,
                lookup.taxonomy,
                lookup.concept,
                lookup.units,
            );
            (!series.is_empty()).then(|| SeriesPick::found(lookup.taxonomy, lookup.concept, series))
        })
        .unwrap_or_default()
}

fn ttm_support_score(series: &[Fact]) -> usize {
    let has_fy = series
        .iter()
        .any(|f| f.fp == Some(FiscalPeriod::FY) || f.has_form(ANNUAL_FORMS));
    let quarter_tagged = series
        .iter()
        .filter(|f| f.fp.map_or(false, |fp| fp.is_quarter()) || f.has_form(QUARTERLY_FORMS))
        .count();

    let mut score = series.len().min(20);
    if has_fy {
        score += 100;
    }
    if quarter_tagged >= 4 {
        score += 50;
    }
    score
}

/// Among several candidate concepts in one taxonomy, prefers the series that
/// can feed both an annual and a trailing-twelve-month figure. The first
/// candidate wins ties.
pub fn best_series_by_ttm_support(
    facts: &CompanyFacts,
    taxonomy: Taxonomy,
    concepts: &[&str],
    units: &[&str],
) -> SeriesPick {
    let mut best = SeriesPick::default();
    let mut best_score = None;

    for concept in concepts {
        let series = pick_unit_series_with_currency_fallback(facts, taxonomy, concept, units);
        if series.is_empty() {
            continue;
        }
        let score = ttm_support_score(&series);
        if best_score.map_or(true, |b| score > b) {
            best_score = Some(score);
            best = SeriesPick::found(taxonomy, concept, series);
        }
    }
    best
}

pub fn filter_by_forms(series: &[Fact], forms: &[&str]) -> Vec<Fact> {
    series.iter().filter(|f| f.has_form(forms)).cloned().collect()
}

pub fn filter_by_fiscal_period(series: &[Fact], periods: &[FiscalPeriod]) -> Vec<Fact> {
    series
        .iter()
        .filter(|f| f.fp.map_or(false, |fp| periods.contains(&fp)))
        .cloned()
        .collect()
}

/// Explicit full-year facts from annual forms, else anything whose duration
/// looks like a year.
pub fn annual_series(series: &[Fact]) -> Vec<Fact> {
    let explicit = filter_by_fiscal_period(&filter_by_forms(series, ANNUAL_FORMS), &[FiscalPeriod::FY]);
    if !explicit.is_empty() {
        return explicit;
    }
    series.iter().filter(|f| is_annual_like(f)).cloned().collect()
}

/// Latest fact ending on or before `end`.
pub fn latest_as_of(series: &[Fact], end: NaiveDate) -> Option<&Fact> {
    series.iter().filter(|f| f.end <= end).last()
}

/// Exact `end` match, else latest on or before `end`, else the last fact.
pub fn anchored(series: &[Fact], end: NaiveDate) -> Option<&Fact> {
    series
        .iter()
        .filter(|f| f.end == end)
        .last()
        .or_else(|| latest_as_of(series, end))
        .or_else(|| series.last())
}

/// Full-year value aligned to `end`: explicit FY facts first, then
/// annual-like durations.
pub fn annual_value_as_of(series: &[Fact], end: NaiveDate) -> Option<&Fact> {
    let explicit: Vec<&Fact> = series
        .iter()
        .filter(|f| f.fp == Some(FiscalPeriod::FY) && f.is_annual_form())
        .collect();
    if !explicit.is_empty() {
        return explicit
            .iter()
            .rev()
            .find(|f| f.end == end)
            .or_else(|| explicit.iter().rev().find(|f| f.end <= end))
            .or_else(|| explicit.last())
            .copied();
    }

    let annual: Vec<Fact> = series.iter().filter(|f| is_annual_like(f)).cloned().collect();
    let end = anchored(&annual, end)?.end;
    series.iter().rev().find(|f| f.end == end)
}

/// Balance-sheet view of a series: balance-sheet forms, else annual-like
/// facts, else everything.
pub fn balance_sheet_series(series: &[Fact]) -> Vec<Fact> {
    let by_form = filter_by_forms(series, BALANCE_SHEET_FORMS);
    if !by_form.is_empty() {
        return by_form;
    }
    let annual: Vec<Fact> = series.iter().filter(|f| is_annual_like(f)).cloned().collect();
    if !annual.is_empty() {
        return annual;
    }
    series.to_vec()
}

pub fn latest_balance_end(series: &[Fact]) -> Option<NaiveDate> {
    balance_sheet_series(series).last().map(|f| f.end)
}

/// Balance as of `end`, or the most recent balance when none precedes it.
pub fn balance_value_as_of(series: &[Fact], end: NaiveDate) -> Option<f64> {
    let balances = balance_sheet_series(series);
    latest_as_of(&balances, end)
        .or_else(|| balances.last())
        .map(|f| f.val)
        .filter(|v| v.is_finite())
}

// Line-item pickers shared by the engines.

const IFRS_CURRENCY_UNITS: &[&str] = &["DKK", "EUR", "USD"];
const MULTI_CURRENCY_UNITS: &[&str] = &["USD", "DKK", "EUR"];

/// Revenue: the best-supported us-gaap concept, else the best ifrs-full one.
pub fn revenue_series(facts: &CompanyFacts) -> SeriesPick {
    let us = best_series_by_ttm_support(facts, Taxonomy::UsGaap, concepts::REVENUE, concepts::CURRENCY_UNITS);
    if !us.is_empty() {
        return us;
    }
    best_series_by_ttm_support(facts, Taxonomy::IfrsFull, concepts::REVENUE, MULTI_CURRENCY_UNITS)
}

pub fn net_income_series(facts: &CompanyFacts) -> SeriesPick {
    first_series(
        facts,
        &ConceptLookup::us_gaap_then_ifrs(concepts::NET_INCOME, MULTI_CURRENCY_UNITS),
    )
}

pub fn equity_series(facts: &CompanyFacts) -> SeriesPick {
    first_series(
        facts,
        &ConceptLookup::per_concept_both_taxonomies(concepts::EQUITY, concepts::CURRENCY_UNITS, IFRS_CURRENCY_UNITS),
    )
}

pub fn operating_cash_flow_series(facts: &CompanyFacts) -> SeriesPick {
    first_series(
        facts,
        &ConceptLookup::per_concept_both_taxonomies(
            concepts::OPERATING_CASH_FLOW,
            concepts::CURRENCY_UNITS,
            IFRS_CURRENCY_UNITS,
        ),
    )
}

pub fn capex_series(facts: &CompanyFacts) -> SeriesPick {
    first_series(
        facts,
        &ConceptLookup::per_concept_both_taxonomies(concepts::CAPEX, concepts::CURRENCY_UNITS, IFRS_CURRENCY_UNITS),
    )
}

pub fn eps_series(facts: &CompanyFacts) -> SeriesPick {
    first_series(facts, &ConceptLookup::us_gaap_then_ifrs(concepts::EPS, concepts::EPS_UNITS))
}

/// Weighted diluted share count, else basic.
pub fn weighted_shares_series(facts: &CompanyFacts) -> SeriesPick {
    let lookups: Vec<ConceptLookup> = concepts::WEIGHTED_SHARES
        .iter()
        .map(|c| ConceptLookup::new(Taxonomy::UsGaap, *c, concepts::SHARE_UNITS))
        .collect();
    lookups
        .iter()
        .find_map(|lookup| {
            let series = pick_unit_series(facts, lookup.taxonomy, lookup.concept, lookup.units);
            (!series.is_empty()).then(|| SeriesPick::found(lookup.taxonomy, lookup.concept, series))
        })
        .unwrap_or_default()
}

/// Balance-sheet and income-statement lines: all us-gaap candidates, then
/// ifrs-full, in any reporting currency.
pub fn statement_series(facts: &CompanyFacts, candidates: &'static [&'static str]) -> SeriesPick {
    first_series(facts, &ConceptLookup::us_gaap_then_ifrs(candidates, &[]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_normalize_keeps_latest_filing_per_end() {
        let facts = vec![
            Fact::new(d(2023, 12, 31), 100.0).with_filed(d(2024, 2, 1)),
            Fact::new(d(2022, 12, 31), 90.0).with_filed(d(2023, 2, 1)),
            Fact::new(d(2023, 12, 31), 105.0).with_filed(d(2024, 5, 1)),
            Fact::new(d(2023, 12, 31), 99.0),
        ];
        let series = normalize_facts(&facts);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].end, d(2022, 12, 31));
        assert_eq!(series[1].val, 105.0);
        assert!(series.windows(2).all(|w| w[0].end < w[1].end));
    }

    #[test]
    fn test_normalize_equal_filed_keeps_later_input() {
        let filed = d(2024, 2, 1);
        let facts = vec![
            Fact::new(d(2023, 12, 31), 1.0).with_filed(filed),
            Fact::new(d(2023, 12, 31), 2.0).with_filed(filed),
        ];
        assert_eq!(normalize_facts(&facts)[0].val, 2.0);

        let unfiled = vec![Fact::new(d(2023, 12, 31), 1.0), Fact::new(d(2023, 12, 31), 2.0)];
        assert_eq!(normalize_facts(&unfiled)[0].val, 2.0);
    }

    #[test]
    fn test_unit_preference_and_currency_fallback() {
        let facts = CompanyFacts::default()
            .with_facts(Taxonomy::IfrsFull, "Revenue", "EUR", vec![Fact::new(d(2023, 12, 31), 5.0)])
            .with_facts(Taxonomy::IfrsFull, "Revenue", "pure", vec![Fact::new(d(2023, 12, 31), 9.0)]);

        assert!(pick_unit_series(&facts, Taxonomy::IfrsFull, "Revenue", &["USD"]).is_empty());
        let series = pick_unit_series_with_currency_fallback(&facts, Taxonomy::IfrsFull, "Revenue", &["USD"]);
        assert_eq!(series[0].val, 5.0);
        assert!(pick_unit_series_with_currency_fallback(&facts, Taxonomy::UsGaap, "Revenue", &[]).is_empty());
    }

    #[test]
    fn test_lookup_orders() {
        const CS: &[&str] = &["A", "B"];
        const U: &[&str] = &["USD"];
        let order: Vec<(Taxonomy, &str)> = ConceptLookup::us_gaap_then_ifrs(CS, U)
            .iter()
            .map(|l| (l.taxonomy, l.concept))
            .collect();
        assert_eq!(
            order,
            vec![
                (Taxonomy::UsGaap, "A"),
                (Taxonomy::UsGaap, "B"),
                (Taxonomy::IfrsFull, "A"),
                (Taxonomy::IfrsFull, "B"),
            ]
        );

        let order: Vec<(Taxonomy, &str)> = ConceptLookup::per_concept_both_taxonomies(CS, U, U)
            .iter()
            .map(|l| (l.taxonomy, l.concept))
            .collect();
        assert_eq!(order[1], (Taxonomy::IfrsFull, "A"));
        assert_eq!(order[2], (Taxonomy::UsGaap, "B"));
    }

    #[test]
    fn test_first_series_stops_at_first_hit() {
        let facts = CompanyFacts::default()
            .with_facts(Taxonomy::IfrsFull, "ProfitLoss", "USD", vec![Fact::new(d(2023, 12, 31), 3.0)])
            .with_facts(Taxonomy::UsGaap, "ProfitLoss", "USD", vec![Fact::new(d(2023, 12, 31), 4.0)]);
        let pick = net_income_series(&facts);
        assert_eq!(pick.taxonomy, Some(Taxonomy::UsGaap));
        assert_eq!(pick.concept.as_deref(), Some("ProfitLoss"));
        assert_eq!(pick.series[0].val, 4.0);

        assert!(net_income_series(&CompanyFacts::default()).is_empty());
    }

    #[test]
    fn test_best_series_prefers_fy_support() {
        let fy = |y: i32| {
            Fact::new(d(y, 12, 31), 10.0)
                .with_start(d(y, 1, 1))
                .with_period(FiscalPeriod::FY)
                .with_form("10-K")
        };
        let facts = CompanyFacts::default()
            .with_facts(
                Taxonomy::UsGaap,
                "Revenues",
                "USD",
                (2000..2010).map(|y| Fact::new(d(y, 12, 31), 1.0)).collect(),
            )
            .with_facts(Taxonomy::UsGaap, "SalesRevenueNet", "USD", vec![fy(2022), fy(2023)]);
        let pick = revenue_series(&facts);
        assert_eq!(pick.concept.as_deref(), Some("SalesRevenueNet"));
    }

    #[test]
    fn test_annual_series_falls_back_to_duration() {
        let series = vec![
            Fact::new(d(2022, 12, 31), 1.0).with_start(d(2022, 1, 1)),
            Fact::new(d(2023, 3, 31), 2.0).with_start(d(2023, 1, 1)),
            Fact::new(d(2023, 12, 31), 3.0).with_start(d(2023, 1, 1)),
        ];
        let annual = annual_series(&series);
        assert_eq!(annual.iter().map(|f| f.val).collect::<Vec<_>>(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_balance_value_as_of() {
        let series = vec![
            Fact::new(d(2023, 6, 30), 10.0).with_form("10-Q"),
            Fact::new(d(2023, 12, 31), 20.0).with_form("10-K"),
            Fact::new(d(2024, 3, 31), 30.0).with_form("8-K"),
        ];
        assert_eq!(latest_balance_end(&series), Some(d(2023, 12, 31)));
        assert_eq!(balance_value_as_of(&series, d(2023, 9, 30)), Some(10.0));
        assert_eq!(balance_value_as_of(&series, d(2020, 1, 1)), Some(20.0));
        assert_eq!(balance_value_as_of(&[], d(2020, 1, 1)), None);
    }
}
