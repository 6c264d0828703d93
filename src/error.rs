use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated by the analysis engine.
///
/// Per-indicator unavailability (short series, zero-range guards) is not an
/// error - it degrades the affected indicator to `None` and downstream rules
/// skip it. Only a structurally unusable series aborts a call.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {length} candles provided, {required} required")]
    InsufficientData { length: usize, required: usize },

    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle {
        index: usize,
        reason: InvalidCandleKind,
    },
}

/// The candle invariant violated by an [`InvalidCandle`](AnalysisError::InvalidCandle).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum InvalidCandleKind {
    #[error("high {high} is below open, close or low")]
    HighBelowRange { high: Decimal },

    #[error("low {low} is above open, close or high")]
    LowAboveRange { low: Decimal },

    #[error("volume {volume} is negative")]
    NegativeVolume { volume: Decimal },

    #[error("open_time {current} does not follow on from the previous open_time {previous}")]
    NonMonotonicOpenTime {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}
