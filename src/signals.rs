use crate::indicators::IndicatorSet;
use crate::levels::LevelSet;
use crate::patterns::{Bias, Pattern, Reliability};
use derive_more::Constructor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const RSI_OVERSOLD: Decimal = dec!(30);
pub const RSI_OVERBOUGHT: Decimal = dec!(70);
/// Default relative distance within which a level counts as being tested.
pub const DEFAULT_LEVEL_PROXIMITY: Decimal = dec!(0.01);

/// [`Side`] of a signal - Buy or Sell.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
pub enum Side {
    #[serde(alias = "buy", alias = "BUY")]
    Buy,
    #[serde(alias = "sell", alias = "SELL")]
    Sell,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::Buy => "buy",
                Side::Sell => "sell",
            }
        )
    }
}

/// Strength of a signal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

/// Rule that emitted a signal.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub enum SignalSource {
    Macd,
    Rsi,
    Bollinger,
    Pattern(Pattern),
    Support(Decimal),
    Resistance(Decimal),
}

/// A discrete trade signal emitted by one synthesis rule.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize, Constructor)]
pub struct Signal {
    pub source: SignalSource,
    pub side: Side,
    pub strength: Strength,
    pub description: String,
}

/// Synthesize signals from indicators, patterns and levels.
///
/// Rules run in a fixed order (MACD, RSI, Bollinger, patterns, levels) and
/// each contributes at most one signal; the output preserves emission order
/// and is never deduplicated. A rule whose indicator is unavailable is
/// silently skipped.
pub fn synthesize(
    close: Decimal,
    indicators: &IndicatorSet,
    patterns: &[Pattern],
    levels: &LevelSet,
    proximity: Decimal,
) -> Vec<Signal> {
    let mut signals = Vec::new();

    if let (Some(macd), Some(signal)) = (indicators.macd, indicators.macd_signal)
        && macd > signal
    {
        signals.push(Signal::new(
            SignalSource::Macd,
            Side::Buy,
            Strength::Medium,
            "MACD trading above its signal line".to_string(),
        ));
    }

    if let Some(rsi) = indicators.rsi14 {
        if rsi < RSI_OVERSOLD {
            signals.push(Signal::new(
                SignalSource::Rsi,
                Side::Buy,
                Strength::Strong,
                "RSI indicates oversold conditions".to_string(),
            ));
        } else if rsi > RSI_OVERBOUGHT {
            signals.push(Signal::new(
                SignalSource::Rsi,
                Side::Sell,
                Strength::Strong,
                "RSI indicates overbought conditions".to_string(),
            ));
        }
    }

    if let Some(lower) = indicators.bb_lower
        && close < lower
    {
        signals.push(Signal::new(
            SignalSource::Bollinger,
            Side::Buy,
            Strength::Medium,
            "price closed below the lower Bollinger band".to_string(),
        ));
    } else if let Some(upper) = indicators.bb_upper
        && close > upper
    {
        signals.push(Signal::new(
            SignalSource::Bollinger,
            Side::Sell,
            Strength::Medium,
            "price closed above the upper Bollinger band".to_string(),
        ));
    }

    for pattern in patterns {
        let side = match pattern.bias() {
            Bias::Bullish => Side::Buy,
            Bias::Bearish => Side::Sell,
            Bias::Neutral => continue,
        };
        let strength = if pattern.reliability() == Reliability::High {
            Strength::Strong
        } else {
            Strength::Medium
        };
        signals.push(Signal::new(
            SignalSource::Pattern(*pattern),
            side,
            strength,
            format!("detected {pattern} pattern"),
        ));
    }

    // Relative distance needs a non-zero close.
    if !close.is_zero() {
        for &level in &levels.support {
            if (close - level).abs() / close < proximity {
                signals.push(Signal::new(
                    SignalSource::Support(level),
                    Side::Buy,
                    Strength::Strong,
                    format!("price testing support at {level}"),
                ));
            }
        }
        for &level in &levels.resistance {
            if (close - level).abs() / close < proximity {
                signals.push(Signal::new(
                    SignalSource::Resistance(level),
                    Side::Sell,
                    Strength::Strong,
                    format!("price testing resistance at {level}"),
                ));
            }
        }
    }

    signals
}
