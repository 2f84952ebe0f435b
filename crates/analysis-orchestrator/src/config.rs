use anyhow::{Context, Result};
use fundamental_analysis::{FutureChecklistOptions, HealthChecklistOptions, PastChecklistOptions};
use options_analytics::OiWallOptions;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SEC_USER_AGENT: &str = "disclosure-report admin@example.com";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub past: PastChecklistOptions,
    pub future: FutureChecklistOptions,
    pub health: HealthChecklistOptions,
    pub options: OiWallOptions,

    // Cache lifetimes
    pub facts_cache_ttl_secs: i64,   // 3600 (1 hour)
    pub options_cache_ttl_secs: i64, // 300 (5 minutes)

    /// SEC endpoints reject requests without a contact User-Agent.
    pub sec_user_agent: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            past: PastChecklistOptions::default(),
            future: FutureChecklistOptions::default(),
            health: HealthChecklistOptions::default(),
            options: OiWallOptions::default(),
            facts_cache_ttl_secs: 3600,
            options_cache_ttl_secs: 300,
            sec_user_agent: DEFAULT_SEC_USER_AGENT.to_string(),
        }
    }
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

impl ReportConfig {
    /// Thresholds and cache lifetimes from the environment; unset variables
    /// keep their defaults, malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        // "none" or an empty value turns the strike band off.
        let within_pct = match env::var("OPTIONS_WITHIN_PCT") {
            Ok(raw) if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("none") => None,
            Ok(raw) => Some(
                raw.trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid value for OPTIONS_WITHIN_PCT: {:?}", raw))?,
            ),
            Err(_) => defaults.options.within_pct,
        };

        let config = Self {
            past: PastChecklistOptions {
                roe_threshold: var_or("PAST_ROE_THRESHOLD", defaults.past.roe_threshold)?,
            },
            future: FutureChecklistOptions {
                savings_rate: var_or("FUTURE_SAVINGS_RATE", defaults.future.savings_rate)?,
                high_growth_threshold: var_or("FUTURE_HIGH_GROWTH", defaults.future.high_growth_threshold)?,
                roe_threshold: var_or("FUTURE_ROE_THRESHOLD", defaults.future.roe_threshold)?,
            },
            health: HealthChecklistOptions {
                net_debt_to_equity_threshold: var_or(
                    "HEALTH_NET_DEBT_TO_EQUITY",
                    defaults.health.net_debt_to_equity_threshold,
                )?,
                interest_coverage_threshold: var_or(
                    "HEALTH_INTEREST_COVERAGE",
                    defaults.health.interest_coverage_threshold,
                )?,
            },
            options: OiWallOptions {
                within_pct,
                bucket_size: var_or("OPTIONS_BUCKET_SIZE", defaults.options.bucket_size)?,
                top_n: var_or("OPTIONS_TOP_N", defaults.options.top_n)?,
            },
            facts_cache_ttl_secs: var_or("FACTS_CACHE_TTL_SECS", defaults.facts_cache_ttl_secs)?,
            options_cache_ttl_secs: var_or("OPTIONS_CACHE_TTL_SECS", defaults.options_cache_ttl_secs)?,
            sec_user_agent: env::var("SEC_USER_AGENT").unwrap_or(defaults.sec_user_agent),
        };

        Ok(config)
    }
}
