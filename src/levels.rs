use crate::candle::CandleSeries;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of neighbours on each side a local extremum must dominate.
const EXTREMUM_WINDOW: usize = 2;
/// Decimal places used to deduplicate nearby candidate prices.
const LEVEL_PRECISION: u32 = 2;
/// Maximum number of levels reported per kind.
pub const MAX_LEVELS_PER_KIND: usize = 3;

/// Kind of a price level.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A raw local-extremum price candidate.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Level {
    pub price: Decimal,
    pub kind: LevelKind,
}

/// Up to [`MAX_LEVELS_PER_KIND`] support and resistance prices nearest the
/// current close, each in ascending order.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct LevelSet {
    pub support: Vec<Decimal>,
    pub resistance: Vec<Decimal>,
}

/// Raw local-extrema candidates over the interior candles of `series`.
///
/// Candle `i` is a support candidate when its low is strictly below the lows
/// of its two preceding and two following candles; resistance symmetrically
/// over highs. The first and last two candles have no complete neighbourhood
/// and are never candidates.
pub fn candidates(series: &CandleSeries) -> Vec<Level> {
    let candles = series.candles();
    let mut candidates = Vec::new();
    if candles.len() < 2 * EXTREMUM_WINDOW + 1 {
        return candidates;
    }

    for i in EXTREMUM_WINDOW..candles.len() - EXTREMUM_WINDOW {
        let is_support = (1..=EXTREMUM_WINDOW).all(|offset| {
            candles[i].low < candles[i - offset].low && candles[i].low < candles[i + offset].low
        });
        if is_support {
            candidates.push(Level {
                price: candles[i].low,
                kind: LevelKind::Support,
            });
        }

        let is_resistance = (1..=EXTREMUM_WINDOW).all(|offset| {
            candles[i].high > candles[i - offset].high && candles[i].high > candles[i + offset].high
        });
        if is_resistance {
            candidates.push(Level {
                price: candles[i].high,
                kind: LevelKind::Resistance,
            });
        }
    }

    candidates
}

/// Extract the level set nearest the latest close.
///
/// Candidates are deduplicated by rounding to [`LEVEL_PRECISION`] decimal
/// places. Support keeps the candidates strictly below the close, resistance
/// strictly above; a candidate exactly at the close belongs to neither.
pub fn extract(series: &CandleSeries) -> LevelSet {
    let current = series.last().close;
    let mut support = Vec::new();
    let mut resistance = Vec::new();

    for level in candidates(series) {
        let price = level.price.round_dp(LEVEL_PRECISION);
        match level.kind {
            LevelKind::Support => support.push(price),
            LevelKind::Resistance => resistance.push(price),
        }
    }

    support.sort();
    support.dedup();
    support.retain(|price| *price < current);
    if support.len() > MAX_LEVELS_PER_KIND {
        support.drain(..support.len() - MAX_LEVELS_PER_KIND);
    }

    resistance.sort();
    resistance.dedup();
    resistance.retain(|price| *price > current);
    resistance.truncate(MAX_LEVELS_PER_KIND);

    LevelSet {
        support,
        resistance,
    }
}
