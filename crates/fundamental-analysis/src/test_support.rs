//! Fixture builders shared by the unit and scenario tests.

use analysis_core::{CompanyFacts, Fact, FiscalPeriod, Taxonomy};
use chrono::NaiveDate;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Calendar-year 10-K fact.
pub fn annual_fact(year: i32, val: f64) -> Fact {
    Fact::new(d(year, 12, 31), val)
        .with_start(d(year, 1, 1))
        .with_period(FiscalPeriod::FY)
        .with_form("10-K")
        .with_filed(d(year + 1, 2, 15))
}

/// 10-Q fact for calendar quarter `q` (1..=4) of `year`.
pub fn quarter_fact(year: i32, q: u32, val: f64) -> Fact {
    let (start, end, fp) = match q {
        1 => (d(year, 1, 1), d(year, 3, 31), FiscalPeriod::Q1),
        2 => (d(year, 4, 1), d(year, 6, 30), FiscalPeriod::Q2),
        3 => (d(year, 7, 1), d(year, 9, 30), FiscalPeriod::Q3),
        _ => (d(year, 10, 1), d(year, 12, 31), FiscalPeriod::Q4),
    };
    Fact::new(end, val)
        .with_start(start)
        .with_period(fp)
        .with_form("10-Q")
        .with_filed(end + chrono::Duration::days(35))
}

/// Point-in-time balance reported on `form`.
pub fn balance_fact(end: NaiveDate, val: f64, form: &str) -> Fact {
    Fact::new(end, val).with_form(form)
}

/// Payload with every series reported in USD.
pub fn facts_with(entries: &[(Taxonomy, &str, Vec<Fact>)]) -> CompanyFacts {
    let mut facts = CompanyFacts::default();
    for (taxonomy, concept, list) in entries {
        facts.insert_facts(*taxonomy, concept, "USD", list.clone());
    }
    facts
}
