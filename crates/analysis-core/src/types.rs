use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::AnalysisError;

/// Forms whose facts are quarterly figures.
pub const QUARTERLY_FORMS: &[&str] = &["10-Q", "10-Q/A"];

/// Forms whose facts are full fiscal-year figures (domestic and foreign filers).
pub const ANNUAL_FORMS: &[&str] = &["10-K", "10-K/A", "20-F", "20-F/A", "40-F", "40-F/A"];

/// Concept dictionaries a filer may report under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Taxonomy {
    #[serde(rename = "us-gaap")]
    UsGaap,
    #[serde(rename = "ifrs-full")]
    IfrsFull,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 2] = [Taxonomy::UsGaap, Taxonomy::IfrsFull];

    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::UsGaap => "us-gaap",
            Taxonomy::IfrsFull => "ifrs-full",
        }
    }
}

impl std::fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fiscal period tag attached to a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalPeriod {
    FY,
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FiscalPeriod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "FY" => Some(FiscalPeriod::FY),
            "Q1" => Some(FiscalPeriod::Q1),
            "Q2" => Some(FiscalPeriod::Q2),
            "Q3" => Some(FiscalPeriod::Q3),
            "Q4" => Some(FiscalPeriod::Q4),
            _ => None,
        }
    }

    pub fn is_quarter(&self) -> bool {
        !matches!(self, FiscalPeriod::FY)
    }
}

/// Unknown tags (H1, M9, ...) are treated as absent rather than rejected.
fn lenient_fiscal_period<'de, D>(deserializer: D) -> Result<Option<FiscalPeriod>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(FiscalPeriod::parse))
}

/// One reported observation for a (taxonomy, concept, unit) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub end: NaiveDate,
    /// Present only for duration facts; balance-sheet balances have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    pub val: f64,
    /// Accession number of the filing that reported this value.
    #[serde(default)]
    pub accn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<i32>,
    #[serde(
        default,
        deserialize_with = "lenient_fiscal_period",
        skip_serializing_if = "Option::is_none"
    )]
    pub fp: Option<FiscalPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filed: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl Fact {
    pub fn new(end: NaiveDate, val: f64) -> Self {
        Self {
            end,
            start: None,
            val,
            accn: String::new(),
            fy: None,
            fp: None,
            form: None,
            filed: None,
            frame: None,
        }
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_period(mut self, fp: FiscalPeriod) -> Self {
        self.fp = Some(fp);
        self
    }

    pub fn with_form(mut self, form: &str) -> Self {
        self.form = Some(form.to_string());
        self
    }

    pub fn with_filed(mut self, filed: NaiveDate) -> Self {
        self.filed = Some(filed);
        self
    }

    /// Length of the reporting period in days, for duration facts.
    pub fn duration_days(&self) -> Option<i64> {
        self.start.map(|start| (self.end - start).num_days())
    }

    pub fn is_quarterly_form(&self) -> bool {
        self.form.as_deref().map_or(false, |f| QUARTERLY_FORMS.contains(&f))
    }

    pub fn is_annual_form(&self) -> bool {
        self.form.as_deref().map_or(false, |f| ANNUAL_FORMS.contains(&f))
    }

    pub fn has_form(&self, forms: &[&str]) -> bool {
        self.form.as_deref().map_or(false, |f| forms.contains(&f))
    }

    pub fn end_year(&self) -> i32 {
        self.end.year()
    }
}

/// All unit-keyed fact lists reported for one concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub units: BTreeMap<String, Vec<Fact>>,
}

/// Raw company-facts payload: taxonomy → concept → unit → facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik: Option<u64>,
    #[serde(rename = "entityName", default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub facts: BTreeMap<String, BTreeMap<String, ConceptFacts>>,
}

impl CompanyFacts {
    pub fn from_json(raw: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn concept(&self, taxonomy: Taxonomy, concept: &str) -> Option<&ConceptFacts> {
        self.facts.get(taxonomy.as_str())?.get(concept)
    }

    /// Every concept reported under `taxonomy`, in name order.
    pub fn concepts(&self, taxonomy: Taxonomy) -> impl Iterator<Item = (&str, &ConceptFacts)> {
        self.facts
            .get(taxonomy.as_str())
            .into_iter()
            .flat_map(|concepts| concepts.iter().map(|(name, facts)| (name.as_str(), facts)))
    }

    /// Appends facts under (taxonomy, concept, unit), creating the path as needed.
    pub fn insert_facts(&mut self, taxonomy: Taxonomy, concept: &str, unit: &str, facts: Vec<Fact>) {
        self.facts
            .entry(taxonomy.as_str().to_string())
            .or_default()
            .entry(concept.to_string())
            .or_default()
            .units
            .entry(unit.to_string())
            .or_default()
            .extend(facts);
    }

    pub fn with_facts(mut self, taxonomy: Taxonomy, concept: &str, unit: &str, facts: Vec<Fact>) -> Self {
        self.insert_facts(taxonomy, concept, unit, facts);
        self
    }
}

/// Which fallback tier produced a trailing-twelve-month figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TtmSource {
    ExplicitQuarterly,
    DurationQuarterly,
    Annual,
    DurationAnnual,
}

impl TtmSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtmSource::ExplicitQuarterly => "explicit-quarterly",
            TtmSource::DurationQuarterly => "duration-quarterly",
            TtmSource::Annual => "annual",
            TtmSource::DurationAnnual => "duration-annual",
        }
    }}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TtmObservation {
    pub end: NaiveDate,
    pub value: f64,
    pub source: TtmSource,
}

/// Outcome of a multi-year growth computation. A turnaround is never a
/// growth rate; only `CompoundGrowth` carries a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GrowthResult {
    CompoundGrowth { value: f64 },
    Turnaround { year: i32, label: String },
    NotAvailable { reason: String },
}

impl GrowthResult {
    pub fn turnaround(year: i32) -> Self {
        GrowthResult::Turnaround {
            year,
            label: format!("recovered to profit in {}", year),
        }
    }

    pub fn not_available(reason: impl Into<String>) -> Self {
        GrowthResult::NotAvailable { reason: reason.into() }
    }

    pub fn compound_value(&self) -> Option<f64> {
        match self {
            GrowthResult::CompoundGrowth { value } => Some(*value),
            _ => None,
        }
    }}

/// One pass/fail line of a checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem<K> {
    pub key: K,
    pub label: String,
    pub pass: bool,
    pub detail: String,
}

impl<K> ChecklistItem<K> {
    pub fn new(key: K, label: &str, pass: bool, detail: impl Into<String>) -> Self {
        Self {
            key,
            label: label.to_string(),
            pass,
            detail: detail.into(),
        }
    }
}

/// Number of passing items.
pub fn checklist_score<K>(items: &[ChecklistItem<K>]) -> u32 {
    items.iter().filter(|item| item.pass).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_deserializes_filings_shape() {
        let raw = r#"{
            "start": "2023-01-01", "end": "2023-12-31", "val": 1500,
            "accn": "0000320193-24-000006", "fy": 2023, "fp": "FY",
            "form": "10-K", "filed": "2024-02-01", "frame": "CY2023"
        }"#;
        let fact: Fact = serde_json::from_str(raw).unwrap();
        assert_eq!(fact.fp, Some(FiscalPeriod::FY));
        assert_eq!(fact.duration_days(), Some(364));
        assert!(fact.is_annual_form());
        assert!(!fact.is_quarterly_form());
        assert!((fact.val - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_fiscal_period_is_absent() {
        let raw = r#"{"end": "2023-06-30", "val": 1.0, "accn": "x", "fp": "H1"}"#;
        let fact: Fact = serde_json::from_str(raw).unwrap();
        assert_eq!(fact.fp, None);
        assert_eq!(fact.start, None);
        assert_eq!(fact.duration_days(), None);
    }

    #[test]
    fn test_company_facts_lookup() {
        let raw = r#"{
            "cik": 320193,
            "entityName": "Example Inc.",
            "facts": {
                "us-gaap": {
                    "Assets": {
                        "label": "Assets",
                        "units": { "USD": [ {"end": "2023-12-31", "val": 10, "accn": "a"} ] }
                    }
                }
            }
        }"#;
        let facts = CompanyFacts::from_json(raw).unwrap();
        assert_eq!(facts.entity_name.as_deref(), Some("Example Inc."));
        assert!(facts.concept(Taxonomy::UsGaap, "Assets").is_some());
        assert!(facts.concept(Taxonomy::IfrsFull, "Assets").is_none());
        assert_eq!(facts.concepts(Taxonomy::UsGaap).count(), 1);
    }

    #[test]
    fn test_invalid_payload_is_invalid_data() {
        let err = CompanyFacts::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidData(_)));
    }

    #[test]
    fn test_growth_result_wire_shape() {
        let json = serde_json::to_value(GrowthResult::turnaround(2019)).unwrap();
        assert_eq!(json["kind"], "turnaround");
        assert_eq!(json["year"], 2019);
        assert_eq!(json["label"], "recovered to profit in 2019");

        let json = serde_json::to_value(GrowthResult::CompoundGrowth { value: 0.1 }).unwrap();
        assert_eq!(json["kind"], "compound-growth");

        let json = serde_json::to_value(GrowthResult::not_available("no data")).unwrap();
        assert_eq!(json["kind"], "not-available");
        assert_eq!(json["reason"], "no data");
    }

    #[test]
    fn test_ttm_source_wire_names() {
        let json = serde_json::to_value(TtmSource::ExplicitQuarterly).unwrap();
        assert_eq!(json, "explicit-quarterly");
        assert_eq!(TtmSource::DurationAnnual.as_str(), "duration-annual");
    }

    #[test]
    fn test_checklist_score_counts_passes() {
        let items = vec![
            ChecklistItem::new("a", "A", true, ""),
            ChecklistItem::new("b", "B", false, ""),
            ChecklistItem::new("c", "C", true, ""),
        ];
        assert_eq!(checklist_score(&items), 2);
    }
}
