//! Display strings for report consumers.

use analysis_core::GrowthResult;

pub const NOT_AVAILABLE: &str = "n/a";

/// `0.131` → `"13.10%"`.
pub fn format_pct(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Compact amount with a T/B/M/K suffix.
pub fn format_money(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };
    let abs = v.abs();
    if abs >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", v / 1e3)
    } else {
        format!("{:.0}", v)
    }
}

pub fn format_ratio(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1}x", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_growth(growth: &GrowthResult) -> String {
    match growth {
        GrowthResult::CompoundGrowth { value } => format_pct(Some(*value)),
        GrowthResult::Turnaround { label, .. } => label.clone(),
        GrowthResult::NotAvailable { .. } => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(Some(0.131)), "13.10%");
        assert_eq!(format_pct(Some(-0.05)), "-5.00%");
        assert_eq!(format_pct(None), "n/a");
        assert_eq!(format_pct(Some(f64::INFINITY)), "n/a");
    }

    #[test]
    fn test_format_money_suffixes() {
        assert_eq!(format_money(Some(2.5e12)), "2.50T");
        assert_eq!(format_money(Some(971.02e6)), "971.02M");
        assert_eq!(format_money(Some(-1.65e9)), "-1.65B");
        assert_eq!(format_money(Some(1500.0)), "1.50K");
        assert_eq!(format_money(Some(42.0)), "42");
        assert_eq!(format_money(None), "n/a");
    }

    #[test]
    fn test_format_growth_branches() {
        assert_eq!(format_growth(&GrowthResult::CompoundGrowth { value: 0.1 }), "10.00%");
        assert_eq!(format_growth(&GrowthResult::turnaround(2015)), "recovered to profit in 2015");
        assert_eq!(format_growth(&GrowthResult::not_available("x")), "n/a");
        assert_eq!(format_ratio(Some(-7.43)), "-7.4x");
    }
}
