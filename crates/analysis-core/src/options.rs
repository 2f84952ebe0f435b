use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::quote::{lenient_count, lenient_date};

/// One strike on one side of an expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionLeg {
    pub strike: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub open_interest: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub volume: Option<u64>,
}

impl OptionLeg {
    pub fn new(strike: f64, open_interest: u64) -> Self {
        Self {
            strike,
            open_interest: Some(open_interest),
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn oi(&self) -> u64 {
        self.open_interest.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionExpiration {
    #[serde(deserialize_with = "lenient_date")]
    pub expiration_date: Option<NaiveDate>,
    pub calls: Vec<OptionLeg>,
    pub puts: Vec<OptionLeg>,
}

/// Expirations in the order the provider lists them (nearest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionChain {
    pub expirations: Vec<OptionExpiration>,
}

impl OptionChain {
    pub fn from_json(raw: &str) -> Result<Self, crate::AnalysisError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn nearest(&self) -> Option<&OptionExpiration> {
        self.expirations.first()
    }
}

/// Aggregated open interest at one (bucketed) strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OiWall {
    pub strike: f64,
    pub open_interest: u64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsSnapshot {
    pub spot: Option<f64>,
    pub expiration_date: Option<NaiveDate>,
    pub call_walls: Vec<OiWall>,
    pub put_walls: Vec<OiWall>,
    pub max_pain_strike: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_from_json() {
        let raw = r#"{
            "expirations": [{
                "expirationDate": 1718928000,
                "calls": [{ "strike": 100.0, "openInterest": 500, "volume": 20 }],
                "puts": [{ "strike": 95.0 }]
            }]
        }"#;
        let chain = OptionChain::from_json(raw).unwrap();
        let exp = chain.nearest().unwrap();
        assert_eq!(exp.expiration_date, NaiveDate::from_ymd_opt(2024, 6, 21));
        assert_eq!(exp.calls[0].oi(), 500);
        assert_eq!(exp.puts[0].oi(), 0);
        assert_eq!(exp.puts[0].volume, None);
    }

    #[test]
    fn test_leg_counts_decode_leniently() {
        let raw = r#"{
            "expirations": [{
                "calls": [
                    { "strike": 100.0, "openInterest": 1200.0, "volume": { "raw": 35, "fmt": "35" } },
                    { "strike": 105.0, "openInterest": { "raw": 640.4 }, "volume": "n/a" },
                    { "strike": 110.0, "openInterest": null, "volume": -3 }
                ]
            }]
        }"#;
        let chain = OptionChain::from_json(raw).unwrap();
        let calls = &chain.nearest().unwrap().calls;
        assert_eq!(calls[0].oi(), 1200);
        assert_eq!(calls[0].volume, Some(35));
        assert_eq!(calls[1].oi(), 640);
        assert_eq!(calls[1].volume, None);
        assert_eq!(calls[2].open_interest, None);
        assert_eq!(calls[2].volume, None);
    }
}
