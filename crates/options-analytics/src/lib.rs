//! Open-interest walls and max pain over a single options expiration.

use analysis_core::{OiWall, OptionChain, OptionLeg, OptionsSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strikes are keyed in thousandths so float noise cannot split a bucket.
const STRIKE_SCALE: f64 = 1000.0;

fn strike_key(strike: f64) -> i64 {
    (strike * STRIKE_SCALE).round() as i64
}

fn key_strike(key: i64) -> f64 {
    key as f64 / STRIKE_SCALE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OiWallOptions {
    /// Keep strikes within this fraction of spot; `None` keeps everything.
    pub within_pct: Option<f64>,
    /// Strike increment to merge into; `<= 0` disables bucketing.
    pub bucket_size: f64,
    pub top_n: usize,
}

impl Default for OiWallOptions {
    fn default() -> Self {
        Self {
            within_pct: Some(0.30),
            bucket_size: 1.0,
            top_n: 3,
        }
    }
}

fn in_band(strike: f64, spot: Option<f64>, within_pct: Option<f64>) -> bool {
    match (spot, within_pct) {
        (Some(spot), Some(pct)) if spot.is_finite() && spot > 0.0 => {
            strike >= spot * (1.0 - pct) && strike <= spot * (1.0 + pct)
        }
        _ => true,
    }
}

fn bucket(strike: f64, size: f64) -> f64 {
    if size > 0.0 {
        (strike / size).round() * size
    } else {
        strike
    }
}

/// Open interest and volume summed per bucketed strike, largest OI first.
/// Buckets with no open interest are dropped.
pub fn aggregate_open_interest(legs: &[OptionLeg], spot: Option<f64>, opts: &OiWallOptions) -> Vec<OiWall> {
    let mut buckets: BTreeMap<i64, (u64, u64)> = BTreeMap::new();
    for leg in legs {
        if !leg.strike.is_finite() || !in_band(leg.strike, spot, opts.within_pct) {
            continue;
        }
        let entry = buckets
            .entry(strike_key(bucket(leg.strike, opts.bucket_size)))
            .or_insert((0, 0));
        entry.0 += leg.oi();
        entry.1 += leg.volume.unwrap_or(0);
    }

    let mut walls: Vec<OiWall> = buckets
        .into_iter()
        .filter(|(_, (oi, _))| *oi > 0)
        .map(|(key, (open_interest, volume))| OiWall {
            strike: key_strike(key),
            open_interest,
            volume,
        })
        .collect();
    walls.sort_by(|a, b| {
        b.open_interest
            .cmp(&a.open_interest)
            .then(a.strike.total_cmp(&b.strike))
    });
    walls
}

pub fn top_walls(legs: &[OptionLeg], spot: Option<f64>, opts: &OiWallOptions) -> Vec<OiWall> {
    let mut walls = aggregate_open_interest(legs, spot, opts);
    walls.truncate(opts.top_n);
    walls
}

/// Settlement strike that minimizes what option writers owe, scanned over
/// every strike in either leg. Ties go to the lowest strike.
pub fn max_pain(calls: &[OptionLeg], puts: &[OptionLeg]) -> Option<f64> {
    // (call OI, put OI) per strike
    let mut strikes: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
    for leg in calls.iter().filter(|l| l.strike.is_finite()) {
        strikes.entry(strike_key(leg.strike)).or_insert((0.0, 0.0)).0 += leg.oi() as f64;
    }
    for leg in puts.iter().filter(|l| l.strike.is_finite()) {
        strikes.entry(strike_key(leg.strike)).or_insert((0.0, 0.0)).1 += leg.oi() as f64;
    }

    let mut best: Option<(i64, f64)> = None;
    for &candidate in strikes.keys() {
        let settle = key_strike(candidate);
        let pain: f64 = strikes
            .iter()
            .map(|(&key, &(call_oi, put_oi))| {
                let k = key_strike(key);
                call_oi * (settle - k).max(0.0) + put_oi * (k - settle).max(0.0)
            })
            .sum();
        if best.map_or(true, |(_, min)| pain < min) {
            best = Some((candidate, pain));
        }
    }
    best.map(|(key, _)| key_strike(key))
}

/// Walls and max pain for the nearest expiration. `None` when it has no legs.
pub fn build_snapshot(chain: &OptionChain, spot: Option<f64>, opts: &OiWallOptions) -> Option<OptionsSnapshot> {
    let expiration = chain.nearest()?;
    if expiration.calls.is_empty() && expiration.puts.is_empty() {
        tracing::debug!("nearest expiration has no legs");
        return None;
    }

    Some(OptionsSnapshot {
        spot,
        expiration_date: expiration.expiration_date,
        call_walls: top_walls(&expiration.calls, spot, opts),
        put_walls: top_walls(&expiration.puts, spot, opts),
        max_pain_strike: max_pain(&expiration.calls, &expiration.puts),
    })
}
