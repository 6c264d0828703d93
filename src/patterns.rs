use crate::candle::{Candle, CandleSeries};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Body-to-range ratio below which the final candle is a Doji.
const DOJI_BODY_RATIO: Decimal = dec!(0.1);
const HAMMER_LOWER_WICK_RATIO: Decimal = dec!(2);
const HAMMER_UPPER_WICK_RATIO: Decimal = dec!(0.5);

/// Directional bias of a candlestick pattern.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Historical reliability of a candlestick pattern.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    Low,
    Medium,
    High,
}

/// Candlestick formation detected on the final 1-2 candles of a series.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
pub enum Pattern {
    Doji,
    Hammer,
    BullishEngulfing,
    BearishEngulfing,
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Doji => "Doji",
            Pattern::Hammer => "Hammer",
            Pattern::BullishEngulfing => "Bullish Engulfing",
            Pattern::BearishEngulfing => "Bearish Engulfing",
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            Pattern::Doji => Bias::Neutral,
            Pattern::Hammer | Pattern::BullishEngulfing => Bias::Bullish,
            Pattern::BearishEngulfing => Bias::Bearish,
        }
    }

    pub fn reliability(&self) -> Reliability {
        match self {
            Pattern::Doji | Pattern::BullishEngulfing | Pattern::BearishEngulfing => {
                Reliability::High
            }
            Pattern::Hammer => Reliability::Medium,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn is_bullish(candle: &Candle) -> bool {
    candle.close > candle.open
}

fn is_bearish(candle: &Candle) -> bool {
    candle.close < candle.open
}

/// Detect patterns on the final candles of `series`, in fixed order
/// Doji, Hammer, Engulfing. Matches are not mutually exclusive.
pub fn detect(series: &CandleSeries) -> Vec<Pattern> {
    let candles = series.candles();
    let last = series.last();
    let mut patterns = Vec::new();

    // A zero-range candle carries no body/wick information, so no pattern
    // is reported for it.
    let range = last.high - last.low;
    if !range.is_zero() && last.body() < DOJI_BODY_RATIO * range {
        patterns.push(Pattern::Doji);
    }

    let body = last.body();
    let upper_wick = last.high - last.open.max(last.close);
    let lower_wick = last.open.min(last.close) - last.low;
    if lower_wick > HAMMER_LOWER_WICK_RATIO * body && upper_wick < HAMMER_UPPER_WICK_RATIO * body {
        patterns.push(Pattern::Hammer);
    }

    if candles.len() >= 2 {
        let previous = &candles[candles.len() - 2];
        if last.body() > previous.body() {
            if is_bullish(last) && is_bearish(previous) {
                patterns.push(Pattern::BullishEngulfing);
            } else if is_bearish(last) && is_bullish(previous) {
                patterns.push(Pattern::BearishEngulfing);
            }
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn series(ohlc: &[(Decimal, Decimal, Decimal, Decimal)]) -> CandleSeries {
        let candles = ohlc
            .iter()
            .enumerate()
            .map(|(index, (open, high, low, close))| {
                Candle::new(
                    DateTime::from_timestamp_millis(index as i64 * 60_000).unwrap(),
                    *open,
                    *high,
                    *low,
                    *close,
                    dec!(10),
                    DateTime::from_timestamp_millis(index as i64 * 60_000 + 59_999).unwrap(),
                    dec!(1000),
                    10,
                )
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }

    #[test]
    fn test_doji() {
        let series = series(&[(dec!(100), dec!(110), dec!(90), dec!(100.5))]);
        assert_eq!(detect(&series), vec![Pattern::Doji]);
    }

    #[test]
    fn test_zero_range_candle_reports_nothing() {
        let series = series(&[(dec!(100), dec!(100), dec!(100), dec!(100))]);
        assert_eq!(detect(&series), vec![]);
    }

    #[test]
    fn test_hammer() {
        let series = series(&[(dec!(100), dec!(101.4), dec!(95), dec!(101))]);
        assert_eq!(detect(&series), vec![Pattern::Hammer]);
    }

    #[test]
    fn test_long_upper_wick_is_not_a_hammer() {
        let series = series(&[(dec!(100), dec!(103), dec!(95), dec!(101))]);
        assert_eq!(detect(&series), vec![]);
    }

    #[test]
    fn test_bullish_engulfing() {
        let series = series(&[
            (dec!(105), dec!(106), dec!(99), dec!(100)),
            (dec!(99), dec!(107), dec!(98), dec!(106)),
        ]);
        assert_eq!(detect(&series), vec![Pattern::BullishEngulfing]);
    }

    #[test]
    fn test_bearish_engulfing() {
        let series = series(&[
            (dec!(100), dec!(106), dec!(99), dec!(105)),
            (dec!(106), dec!(107), dec!(98), dec!(99)),
        ]);
        assert_eq!(detect(&series), vec![Pattern::BearishEngulfing]);
    }

    #[test]
    fn test_same_direction_candles_never_engulf() {
        let series = series(&[
            (dec!(100), dec!(103), dec!(99), dec!(102)),
            (dec!(100), dec!(108), dec!(99), dec!(107)),
        ]);
        assert_eq!(detect(&series), vec![]);
    }

    #[test]
    fn test_smaller_body_does_not_engulf() {
        let series = series(&[
            (dec!(100), dec!(106), dec!(94), dec!(95)),
            (dec!(99), dec!(101), dec!(95), dec!(100)),
        ]);
        assert_eq!(detect(&series), vec![]);
    }

    #[test]
    fn test_simultaneous_patterns_in_detection_order() {
        // Tiny bearish body inside a wide range engulfing a tinier bullish one.
        let series = series(&[
            (dec!(100), dec!(101), dec!(99), dec!(100.1)),
            (dec!(100.4), dec!(103), dec!(98), dec!(100)),
        ]);
        assert_eq!(
            detect(&series),
            vec![Pattern::Doji, Pattern::BearishEngulfing]
        );
    }
}
