use crate::indicators::IndicatorSet;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const RSI_MIDLINE: Decimal = dec!(50);

/// Overall trend classification.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Uptrend,
    Downtrend,
    Sideways,
    InsufficientData,
}

impl Display for TrendLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TrendLabel::Uptrend => "uptrend",
                TrendLabel::Downtrend => "downtrend",
                TrendLabel::Sideways => "sideways",
                TrendLabel::InsufficientData => "insufficient_data",
            }
        )
    }
}

/// +1 above the reference, -1 below, 0 on exact equality.
fn vote(value: Decimal, reference: Decimal) -> i32 {
    if value > reference {
        1
    } else if value < reference {
        -1
    } else {
        0
    }
}

/// Classify the trend from four independent factor votes: SMA20 vs SMA50,
/// MACD vs zero, RSI vs its midline, and close vs the Bollinger middle band.
///
/// A factor whose indicator is unavailable casts no vote; any missing vote
/// yields [`TrendLabel::InsufficientData`] rather than a silently defaulted
/// score. A total score of +-2 or beyond decides the trend.
pub fn classify(close: Decimal, indicators: &IndicatorSet) -> TrendLabel {
    let votes = [
        match (indicators.sma20, indicators.sma50) {
            (Some(short), Some(long)) => Some(vote(short, long)),
            _ => None,
        },
        indicators.macd.map(|macd| vote(macd, Decimal::ZERO)),
        indicators.rsi14.map(|rsi| vote(rsi, RSI_MIDLINE)),
        indicators.bb_middle.map(|middle| vote(close, middle)),
    ];

    let mut score = 0;
    for vote in votes {
        match vote {
            Some(value) => score += value,
            None => return TrendLabel::InsufficientData,
        }
    }

    if score >= 2 {
        TrendLabel::Uptrend
    } else if score <= -2 {
        TrendLabel::Downtrend
    } else {
        TrendLabel::Sideways
    }
}
