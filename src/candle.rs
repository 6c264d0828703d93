use crate::error::{AnalysisError, InvalidCandleKind};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Default number of candles a market-data collaborator is expected to
/// supply for full indicator coverage.
pub const DEFAULT_CANDLE_LIMIT: usize = 100;

/// Candle interval supported by the engine.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::H1
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalised OHLCV [`Candle`] model.
///
/// Carries the full kline record supplied by a market-data collaborator;
/// the engine itself only interprets `open_time` and the OHLCV fields.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize, Constructor)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: DateTime<Utc>,
    pub quote_volume: Decimal,
    pub trade_count: u64,
}

impl Candle {
    /// Check the OHLCV invariants: `high >= max(open, close, low)`,
    /// `low <= min(open, close, high)`, `volume >= 0`.
    pub fn validate(&self) -> Result<(), InvalidCandleKind> {
        if self.high < self.open || self.high < self.close || self.high < self.low {
            return Err(InvalidCandleKind::HighBelowRange { high: self.high });
        }
        if self.low > self.open || self.low > self.close || self.low > self.high {
            return Err(InvalidCandleKind::LowAboveRange { low: self.low });
        }
        if self.volume < Decimal::ZERO {
            return Err(InvalidCandleKind::NegativeVolume {
                volume: self.volume,
            });
        }
        Ok(())
    }

    /// Absolute distance between open and close.
    pub fn body(&self) -> Decimal {
        (self.close - self.open).abs()
    }
}

/// Validated, ordered window of [`Candle`]s.
///
/// Construction guarantees the series is non-empty, every candle satisfies
/// the OHLCV invariants, and `open_time` is strictly increasing. Engine
/// stages rely on these guarantees rather than re-checking them.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(try_from = "Vec<Candle>")]
pub struct CandleSeries(Vec<Candle>);

impl CandleSeries {
    /// Validate `candles` into a [`CandleSeries`].
    pub fn new(candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        if candles.is_empty() {
            return Err(AnalysisError::InsufficientData {
                length: 0,
                required: 1,
            });
        }

        for (index, candle) in candles.iter().enumerate() {
            candle
                .validate()
                .map_err(|reason| AnalysisError::InvalidCandle { index, reason })?;
        }

        for (index, window) in candles.windows(2).enumerate() {
            if window[1].open_time <= window[0].open_time {
                return Err(AnalysisError::InvalidCandle {
                    index: index + 1,
                    reason: InvalidCandleKind::NonMonotonicOpenTime {
                        previous: window[0].open_time,
                        current: window[1].open_time,
                    },
                });
            }
        }

        Ok(Self(candles))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.0
    }

    /// Latest candle of the window.
    pub fn last(&self) -> &Candle {
        self.0.last().expect("CandleSeries is non-empty by construction")
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> Vec<Decimal> {
        self.0.iter().map(|candle| candle.close).collect()
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = AnalysisError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candle_at(ms: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Candle {
        let open_time = DateTime::from_timestamp_millis(ms).unwrap();
        let close_time = DateTime::from_timestamp_millis(ms + 59_999).unwrap();
        Candle::new(open_time, open, high, low, close, dec!(10), close_time, dec!(1000), 42)
    }

    #[test]
    fn test_valid_series() {
        let series = CandleSeries::new(vec![
            candle_at(0, dec!(1), dec!(2), dec!(0.5), dec!(1.5)),
            candle_at(60_000, dec!(1.5), dec!(2.5), dec!(1), dec!(2)),
        ])
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().close, dec!(2));
        assert_eq!(series.closes(), vec![dec!(1.5), dec!(2)]);
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        assert_eq!(
            CandleSeries::new(vec![]),
            Err(AnalysisError::InsufficientData {
                length: 0,
                required: 1
            })
        );
    }

    #[test]
    fn test_high_below_close_rejected() {
        let mut candle = candle_at(0, dec!(1), dec!(2), dec!(0.5), dec!(1.5));
        candle.high = dec!(1.2);
        let result = CandleSeries::new(vec![candle]);
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: InvalidCandleKind::HighBelowRange { .. }
            })
        ));
    }

    #[test]
    fn test_low_above_open_rejected() {
        let mut candle = candle_at(0, dec!(1), dec!(2), dec!(0.5), dec!(1.5));
        candle.low = dec!(1.1);
        let result = CandleSeries::new(vec![candle]);
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: InvalidCandleKind::LowAboveRange { .. }
            })
        ));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut candle = candle_at(0, dec!(1), dec!(2), dec!(0.5), dec!(1.5));
        candle.volume = dec!(-1);
        let result = CandleSeries::new(vec![candle]);
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: InvalidCandleKind::NegativeVolume { .. }
            })
        ));
    }

    #[test]
    fn test_duplicate_open_time_rejected() {
        let result = CandleSeries::new(vec![
            candle_at(0, dec!(1), dec!(2), dec!(0.5), dec!(1.5)),
            candle_at(0, dec!(1.5), dec!(2.5), dec!(1), dec!(2)),
        ]);
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidCandle {
                index: 1,
                reason: InvalidCandleKind::NonMonotonicOpenTime { .. }
            })
        ));
    }

    #[test]
    fn test_out_of_order_open_time_rejected() {
        let result = CandleSeries::new(vec![
            candle_at(60_000, dec!(1), dec!(2), dec!(0.5), dec!(1.5)),
            candle_at(0, dec!(1.5), dec!(2.5), dec!(1), dec!(2)),
        ]);
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidCandle { index: 1, .. })
        ));
    }

    #[test]
    fn test_series_deserialization_revalidates() {
        let candles = vec![
            candle_at(60_000, dec!(1), dec!(2), dec!(0.5), dec!(1.5)),
            candle_at(0, dec!(1.5), dec!(2.5), dec!(1), dec!(2)),
        ];
        let json = serde_json::to_string(&candles).unwrap();
        assert!(serde_json::from_str::<CandleSeries>(&json).is_err());
    }

    #[test]
    fn test_interval_serde_and_display() {
        assert_eq!(serde_json::to_string(&Interval::H4).unwrap(), "\"4h\"");
        assert_eq!(serde_json::from_str::<Interval>("\"1w\"").unwrap(), Interval::W1);
        assert_eq!(Interval::M15.to_string(), "15m");
        assert_eq!(Interval::default(), Interval::H1);
    }
}
