use analysis_core::QuoteSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnershipKey {
    Institutions,
    Insiders,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRow {
    pub key: OwnershipKey,
    pub label: String,
    pub shares: Option<u64>,
    /// Fraction in 0..=1.
    pub pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipBreakdown {
    pub as_of: Option<NaiveDate>,
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub shares_outstanding: Option<f64>,
    pub rows: Vec<OwnershipRow>,
}

/// Percent-style inputs (`62.5`) become fractions; the result is clamped.
fn normalize_fraction(value: Option<f64>) -> Option<f64> {
    let v = value.filter(|v| v.is_finite())?;
    let v = if v > 1.0 { v / 100.0 } else { v };
    Some(v.clamp(0.0, 1.0))
}

fn shares_of(total: Option<f64>, pct: Option<f64>) -> Option<u64> {
    match (total, pct) {
        (Some(total), Some(pct)) => Some((total * pct).round().max(0.0) as u64),
        _ => None,
    }
}

/// Institutions / insiders / everyone else. The provider's institutional
/// figure usually includes insiders, so insiders are netted out of it and
/// the three rows sum to one.
pub fn ownership_breakdown(quote: &QuoteSummary) -> OwnershipBreakdown {
    let holders = quote.major_holders_breakdown.as_ref();
    let shares_outstanding = quote
        .default_key_statistics
        .as_ref()
        .and_then(|k| k.shares_outstanding);

    let insiders = normalize_fraction(holders.and_then(|h| h.insiders_percent_held));
    let institutions_raw = normalize_fraction(holders.and_then(|h| h.institutions_percent_held));

    let institutions = match (institutions_raw, insiders) {
        (Some(inst), Some(ins)) => Some((inst - ins).clamp(0.0, 1.0)),
        (inst, _) => inst,
    };
    let other = institutions_raw.map(|inst| (1.0 - inst).clamp(0.0, 1.0));

    let price = quote.price.as_ref();
    let as_of = quote
        .financial_data
        .as_ref()
        .and_then(|fd| fd.most_recent_quarter)
        .or_else(|| price.and_then(|p| p.regular_market_time));

    let row = |key, label: &str, pct| OwnershipRow {
        key,
        label: label.to_string(),
        shares: shares_of(shares_outstanding, pct),
        pct,
    };

    OwnershipBreakdown {
        as_of,
        symbol: price.and_then(|p| p.symbol.clone()),
        exchange: price.and_then(|p| p.exchange_name.clone().or_else(|| p.exchange.clone())),
        shares_outstanding,
        rows: vec![
            row(OwnershipKey::Institutions, "Institutions", institutions),
            row(OwnershipKey::Insiders, "Insiders", insiders),
            row(OwnershipKey::Other, "Public and other", other),
        ],
    }
}
