use crate::candle::{CandleSeries, Interval};
use crate::error::AnalysisError;
use crate::indicators::{IndicatorSet, SMA_LONG_PERIOD};
use crate::levels::{self, LevelSet};
use crate::patterns::{self, Pattern};
use crate::signals::{self, DEFAULT_LEVEL_PROXIMITY, Signal};
use crate::trend::{self, TrendLabel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engine configuration.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum series length accepted by [`AnalysisEngine::get_analysis`].
    ///
    /// Defaults to the longest indicator lookback, so an accepted series
    /// computes every trend vote. 100 candles are recommended for full
    /// indicator coverage.
    pub min_candles: usize,
    /// Relative distance within which a level counts as being tested.
    pub level_proximity: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_candles: SMA_LONG_PERIOD,
            level_proximity: DEFAULT_LEVEL_PROXIMITY,
        }
    }
}

/// Immutable aggregate produced by one analysis call.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct AnalysisResult {
    pub indicators: IndicatorSet,
    pub patterns: Vec<Pattern>,
    pub levels: LevelSet,
    pub signals: Vec<Signal>,
    pub trend: TrendLabel,
}

/// Stateless technical analysis engine - the sole public entry point.
///
/// Holds only configuration; every call constructs its own intermediate
/// values, so values can be freely copied and shared across threads and
/// independent calls run in parallel without contention.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct AnalysisEngine {
    pub config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run the full analysis pipeline over `series`.
    ///
    /// Stages run strictly in order: indicators, patterns, levels, signals,
    /// trend - each a pure function of its inputs, so identical input always
    /// yields an identical result. Fails atomically with
    /// [`AnalysisError::InsufficientData`] when the series is shorter than
    /// the configured minimum; it never returns a partial result. `interval`
    /// participates only in telemetry.
    pub fn get_analysis(
        &self,
        series: &CandleSeries,
        interval: Interval,
    ) -> Result<AnalysisResult, AnalysisError> {
        if series.len() < self.config.min_candles {
            return Err(AnalysisError::InsufficientData {
                length: series.len(),
                required: self.config.min_candles,
            });
        }

        let indicators = IndicatorSet::compute(series);
        let patterns = patterns::detect(series);
        let levels = levels::extract(series);

        let close = series.last().close;
        let signals = signals::synthesize(
            close,
            &indicators,
            &patterns,
            &levels,
            self.config.level_proximity,
        );
        let trend = trend::classify(close, &indicators);

        debug!(
            %interval,
            candles = series.len(),
            patterns = patterns.len(),
            signals = signals.len(),
            %trend,
            "analysis complete"
        );

        Ok(AnalysisResult {
            indicators,
            patterns,
            levels,
            signals,
            trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candle::Candle;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn flat_series(len: usize) -> CandleSeries {
        let candles = (0..len)
            .map(|index| {
                Candle::new(
                    DateTime::from_timestamp_millis(index as i64 * 60_000).unwrap(),
                    dec!(100),
                    dec!(100),
                    dec!(100),
                    dec!(100),
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
    fn test_short_series_is_rejected_atomically() {
        let engine = AnalysisEngine::default();
        assert_eq!(
            engine.get_analysis(&flat_series(10), Interval::H1),
            Err(AnalysisError::InsufficientData {
                length: 10,
                required: 50
            })
        );
    }

    #[test]
    fn test_configured_minimum_is_respected() {
        let engine = AnalysisEngine::new(AnalysisConfig {
            min_candles: 20,
            ..AnalysisConfig::default()
        });
        assert!(engine.get_analysis(&flat_series(20), Interval::H1).is_ok());
        assert!(engine.get_analysis(&flat_series(19), Interval::H1).is_err());
    }

    #[test]
    fn test_degraded_indicators_do_not_abort() {
        // 20 candles: SMA50 and MACD are unavailable, the call still succeeds.
        let engine = AnalysisEngine::new(AnalysisConfig {
            min_candles: 20,
            ..AnalysisConfig::default()
        });
        let result = engine.get_analysis(&flat_series(20), Interval::H1).unwrap();
        assert_eq!(result.indicators.sma50, None);
        assert_eq!(result.indicators.macd, None);
        assert_eq!(result.trend, TrendLabel::InsufficientData);
    }
}
