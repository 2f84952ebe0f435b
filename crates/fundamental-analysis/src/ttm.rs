//! Trailing-twelve-month aggregation with explicit fallback tiers.

use analysis_core::{Fact, FiscalPeriod, TtmObservation, TtmSource};

use crate::period::{is_annual_like, is_quarter_like, QUARTER_DAYS};

fn sorted_by_end(series: &[Fact]) -> Vec<&Fact> {
    let mut sorted: Vec<&Fact> = series.iter().collect();
    sorted.sort_by_key(|f| f.end);
    sorted
}

fn sum_last_four(facts: &[&Fact], source: TtmSource) -> Option<TtmObservation> {
    if facts.len() < 4 {
        return None;
    }
    let last4 = &facts[facts.len() - 4..];
    // A missing quarter in between would make this a longer window.
    let consecutive = last4
        .windows(2)
        .all(|w| (w[1].end - w[0].end).num_days() <= QUARTER_DAYS.1);
    if !consecutive {
        tracing::debug!(end = %last4[3].end, ?source, "latest four quarters are not consecutive");
        return None;
    }
    Some(TtmObservation {
        end: last4[3].end,
        value: last4.iter().map(|f| f.val).sum(),
        source,
    })
}

fn last_of(facts: &[&Fact], source: TtmSource) -> Option<TtmObservation> {
    facts.last().map(|f| TtmObservation {
        end: f.end,
        value: f.val,
        source,
    })
}

fn explicit_annual<'a>(sorted: &[&'a Fact]) -> Vec<&'a Fact> {
    sorted
        .iter()
        .filter(|f| f.fp == Some(FiscalPeriod::FY) && f.is_annual_form())
        .copied()
        .collect()
}

fn duration_annual<'a>(sorted: &[&'a Fact]) -> Vec<&'a Fact> {
    sorted.iter().filter(|f| is_annual_like(f)).copied().collect()
}

/// Trailing-twelve-month value for a flow concept.
///
/// Tiers, first hit wins:
/// 1. four most recent explicit quarters (`Q1`..`Q4` on a quarterly form)
/// 2. four most recent quarter-length durations
/// 3. latest explicit full year on an annual form
/// 4. latest year-length duration
///
/// The quarterly tiers are skipped when their four quarters are not
/// consecutive, i.e. one ends more than a quarter after the previous one.
///
/// Returns `None` when no tier applies; nothing is extrapolated.
pub fn compute_ttm(series: &[Fact]) -> Option<TtmObservation> {
    let sorted = sorted_by_end(series);

    let explicit_quarters: Vec<&Fact> = sorted
        .iter()
        .filter(|f| f.fp.map_or(false, |fp| fp.is_quarter()) && f.is_quarterly_form())
        .copied()
        .collect();
    if let Some(obs) = sum_last_four(&explicit_quarters, TtmSource::ExplicitQuarterly) {
        return Some(obs);
    }

    let quarter_like: Vec<&Fact> = sorted.iter().filter(|f| is_quarter_like(f)).copied().collect();
    if let Some(obs) = sum_last_four(&quarter_like, TtmSource::DurationQuarterly) {
        tracing::debug!(end = %obs.end, "ttm from quarter-length durations");
        return Some(obs);
    }

    latest_annual_sorted(&sorted)
}

fn latest_annual_sorted(sorted: &[&Fact]) -> Option<TtmObservation> {
    last_of(&explicit_annual(sorted), TtmSource::Annual)
        .or_else(|| last_of(&duration_annual(sorted), TtmSource::DurationAnnual))
}

/// Latest full-year value: explicit annual first, then year-length duration.
pub fn latest_annual(series: &[Fact]) -> Option<TtmObservation> {
    latest_annual_sorted(&sorted_by_end(series))
}
