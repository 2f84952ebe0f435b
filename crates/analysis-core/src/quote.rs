use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// The market-data provider wraps most numbers as `{ "raw": 1.2, "fmt": "1.20" }`
/// and sometimes sends `{}` for a missing value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Plain(f64),
    Wrapped { raw: Option<f64> },
    Other(serde_json::Value),
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawNumber> = Option::deserialize(deserializer)?;
    let value = match raw {
        Some(RawNumber::Plain(v)) => Some(v),
        Some(RawNumber::Wrapped { raw }) => raw,
        Some(RawNumber::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// Counts such as open interest. Fractional values are rounded; negative or
/// unreadable ones decode as `None`.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Epoch(i64),
    Wrapped {
        raw: Option<i64>,
        fmt: Option<String>,
    },
    Other(serde_json::Value),
}

fn date_from_text(text: &str) -> Option<NaiveDate> {
    let head = text.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn date_from_epoch(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Accepts `"2024-12-31"`, ISO timestamps, epoch seconds, or the wrapped form.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawDate> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDate::Text(text)) => date_from_text(&text),
        Some(RawDate::Epoch(secs)) => date_from_epoch(secs),
        Some(RawDate::Wrapped { raw, fmt }) => fmt
            .as_deref()
            .and_then(date_from_text)
            .or_else(|| raw.and_then(date_from_epoch)),
        Some(RawDate::Other(_)) | None => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceModule {
    #[serde(deserialize_with = "lenient_number")]
    pub regular_market_price: Option<f64>,
    pub currency: Option<String>,
    pub symbol: Option<String>,
    pub exchange_name: Option<String>,
    pub exchange: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub regular_market_time: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryDetail {
    #[serde(deserialize_with = "lenient_number")]
    pub previous_close: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub market_cap: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialData {
    #[serde(deserialize_with = "lenient_number")]
    pub current_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub return_on_equity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_debt: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_cash: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub ebitda: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub ebit: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub operating_income: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub interest_expense: Option<f64>,
    #[serde(deserialize_with = "lenient_date")]
    pub most_recent_quarter: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EarningsEstimate {
    #[serde(deserialize_with = "lenient_number")]
    pub avg: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub growth: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub year_ago_eps: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueEstimate {
    #[serde(deserialize_with = "lenient_number")]
    pub avg: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub growth: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EpsTrend {
    #[serde(deserialize_with = "lenient_number")]
    pub current: Option<f64>,
}

/// One consensus row; `period` is `0q`, `+1q`, `0y`, `+1y`, `+5y`, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendRow {
    pub period: String,
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_number")]
    pub growth: Option<f64>,
    pub earnings_estimate: Option<EarningsEstimate>,
    pub revenue_estimate: Option<RevenueEstimate>,
    pub eps_trend: Option<EpsTrend>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarningsTrend {
    pub trend: Vec<TrendRow>,
}

impl EarningsTrend {
    pub fn row(&self, period: &str) -> Option<&TrendRow> {
        self.trend.iter().find(|row| row.period == period)
    }

    /// First row present among `periods`, in priority order.
    pub fn row_by_priority(&self, periods: &[&str]) -> Option<&TrendRow> {
        periods.iter().find_map(|period| self.row(period))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MajorHoldersBreakdown {
    #[serde(deserialize_with = "lenient_number")]
    pub insiders_percent_held: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub institutions_percent_held: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyStatistics {
    #[serde(deserialize_with = "lenient_number")]
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetStatement {
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_debt: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub short_long_term_debt_total: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub cash_and_short_term_investments: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub cash: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_assets: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_liab: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetHistory {
    pub balance_sheet_statements: Vec<BalanceSheetStatement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeStatement {
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_number")]
    pub ebit: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub operating_income: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub interest_expense: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeStatementHistory {
    pub income_statement_history: Vec<IncomeStatement>,
}

/// Quote-summary modules used by the forward-looking and health checks.
/// Every module is optional; the provider omits the ones it lacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSummary {
    pub price: Option<PriceModule>,
    pub summary_detail: Option<SummaryDetail>,
    pub financial_data: Option<FinancialData>,
    pub earnings_trend: Option<EarningsTrend>,
    pub major_holders_breakdown: Option<MajorHoldersBreakdown>,
    pub default_key_statistics: Option<KeyStatistics>,
    pub balance_sheet_history_quarterly: Option<BalanceSheetHistory>,
    pub income_statement_history_quarterly: Option<IncomeStatementHistory>,
}

impl QuoteSummary {
    pub fn from_json(raw: &str) -> Result<Self, crate::AnalysisError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Last traded price, falling back to the previous close.
    pub fn spot_price(&self) -> Option<f64> {
        self.price
            .as_ref()
            .and_then(|p| p.regular_market_price)
            .or_else(|| self.financial_data.as_ref().and_then(|fd| fd.current_price))
            .or_else(|| self.summary_detail.as_ref().and_then(|sd| sd.previous_close))
    }

    /// Most recent quarterly balance sheet row, if any.
    pub fn latest_balance_sheet(&self) -> Option<&BalanceSheetStatement> {
        self.balance_sheet_history_quarterly
            .as_ref()
            .and_then(|h| h.balance_sheet_statements.first())
    }

    pub fn quarterly_income_statements(&self) -> &[IncomeStatement] {
        self.income_statement_history_quarterly
            .as_ref()
            .map(|h| h.income_statement_history.as_slice())
            .unwrap_or(&[])
    }
}
