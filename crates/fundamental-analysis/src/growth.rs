use analysis_core::{Fact, GrowthResult};
use chrono::NaiveDate;

use crate::series::{anchored, annual_series};

pub const DEFAULT_HORIZON_YEARS: f64 = 5.0;

const DAYS_PER_YEAR: f64 = 365.25;

pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Compound annual growth rate. Undefined unless both endpoints are
/// positive and the span is positive.
pub fn compound_growth(past: f64, latest: f64, years: f64) -> Option<f64> {
    if !(years > 0.0) || !(past > 0.0) || !(latest > 0.0) {
        return None;
    }
    let value = (latest / past).powf(1.0 / years) - 1.0;
    value.is_finite().then_some(value)
}

/// Most recent point strictly before `latest_end` that is at least
/// `target_years` older.
pub fn pick_past_near_years(annual: &[Fact], latest_end: NaiveDate, target_years: f64) -> Option<&Fact> {
    annual
        .iter()
        .filter(|f| f.end < latest_end && years_between(f.end, latest_end) >= target_years)
        .last()
}

/// Year of the first loss-to-profit transition in an ascending annual series.
pub fn find_turnaround_year(annual: &[Fact]) -> Option<i32> {
    annual
        .windows(2)
        .find(|pair| pair[0].val <= 0.0 && pair[1].val > 0.0)
        .map(|pair| pair[1].end_year())
}

/// CAGR from the point `target_years` before `latest` up to `latest`.
pub fn cagr_over(annual: &[Fact], latest: &Fact, target_years: f64) -> Option<f64> {
    let past = pick_past_near_years(annual, latest.end, target_years)?;
    compound_growth(past.val, latest.val, years_between(past.end, latest.end))
}

/// Multi-year growth of a flow concept, anchored at `anchor_end`.
///
/// When a CAGR is not meaningful (a non-positive endpoint), the first
/// loss-to-profit year is reported instead; failing that, the reason.
pub fn growth_over_horizon(series: &[Fact], anchor_end: NaiveDate, target_years: f64) -> GrowthResult {
    let annual = annual_series(series);
    let Some(latest) = anchored(&annual, anchor_end) else {
        return GrowthResult::not_available("latest annual value not found");
    };

    let Some(past) = pick_past_near_years(&annual, latest.end, target_years) else {
        return match find_turnaround_year(&annual) {
            Some(year) => GrowthResult::turnaround(year),
            None => GrowthResult::not_available("no past value near target years"),
        };
    };

    if let Some(value) = compound_growth(past.val, latest.val, years_between(past.end, latest.end)) {
        return GrowthResult::CompoundGrowth { value };
    }

    match find_turnaround_year(&annual) {
        Some(year) => GrowthResult::turnaround(year),
        None => GrowthResult::not_available(format!(
            "cagr not applicable (past={}, latest={})",
            past.val, latest.val
        )),
    }
}
