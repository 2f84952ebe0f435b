//! Duration heuristics for facts whose fiscal-period tag is missing or
//! unreliable. Both windows are inclusive.

use analysis_core::Fact;

/// Duration window (days) treated as a full year.
pub const ANNUAL_DAYS: (i64, i64) = (330, 400);

/// Duration window (days) treated as a single quarter.
pub const QUARTER_DAYS: (i64, i64) = (80, 120);

fn within(fact: &Fact, (lo, hi): (i64, i64)) -> bool {
    fact.duration_days().map_or(false, |days| days >= lo && days <= hi)
}

pub fn is_annual_like(fact: &Fact) -> bool {
    within(fact, ANNUAL_DAYS)
}

pub fn is_quarter_like(fact: &Fact) -> bool {
    within(fact, QUARTER_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let end = d(2024, 12, 31);
        let at = |days: i64| Fact::new(end, 1.0).with_start(end - chrono::Duration::days(days));

        assert!(is_annual_like(&at(330)));
        assert!(is_annual_like(&at(400)));
        assert!(!is_annual_like(&at(329)));
        assert!(!is_annual_like(&at(401)));

        assert!(is_quarter_like(&at(80)));
        assert!(is_quarter_like(&at(120)));
        assert!(!is_quarter_like(&at(79)));
        assert!(!is_quarter_like(&at(121)));
    }

    #[test]
    fn test_instant_fact_is_neither() {
        let fact = Fact::new(d(2024, 12, 31), 1.0);
        assert!(!is_annual_like(&fact));
        assert!(!is_quarter_like(&fact));
    }
}
