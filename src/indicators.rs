use crate::candle::{Candle, CandleSeries};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const EMA_FAST_PERIOD: usize = 12;
pub const EMA_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;
/// Minimum series length for the MACD triple (slow EMA + signal EMA seed).
pub const MACD_MIN_LEN: usize = 35;
pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_WIDTH: Decimal = Decimal::TWO;
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;

fn mean(window: &[Decimal]) -> Decimal {
    window.iter().copied().sum::<Decimal>() / Decimal::from(window.len() as u64)
}

/// Simple moving average of the last `period` values.
pub fn sma(period: usize, data: &[Decimal]) -> Option<Decimal> {
    if period == 0 || data.len() < period {
        return None;
    }
    Some(mean(&data[data.len() - period..]))
}

/// Exponential moving average series with multiplier `2 / (period + 1)`,
/// seeded from the simple average of the first `period` values.
///
/// The first emitted point corresponds to input index `period - 1`. Empty if
/// the input is shorter than `period`.
pub fn ema_series(period: usize, data: &[Decimal]) -> Vec<Decimal> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let multiplier = Decimal::TWO / Decimal::from(period as u64 + 1);
    let mut out = Vec::with_capacity(data.len() - period + 1);
    let mut prev = mean(&data[..period]);
    out.push(prev);
    for &value in &data[period..] {
        prev += multiplier * (value - prev);
        out.push(prev);
    }
    out
}

/// Latest exponential moving average value.
pub fn ema(period: usize, data: &[Decimal]) -> Option<Decimal> {
    ema_series(period, data).last().copied()
}

/// MACD line (fast EMA minus slow EMA) at every index where both are defined.
pub fn macd_series(data: &[Decimal]) -> Vec<Decimal> {
    let fast = ema_series(EMA_FAST_PERIOD, data);
    let slow = ema_series(EMA_SLOW_PERIOD, data);
    if slow.is_empty() {
        return Vec::new();
    }
    let offset = fast.len() - slow.len();
    fast[offset..]
        .iter()
        .zip(&slow)
        .map(|(fast, slow)| fast - slow)
        .collect()
}

/// Latest MACD triple.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Macd {
    pub macd: Decimal,
    pub signal: Decimal,
    pub histogram: Decimal,
}

/// MACD(12, 26, 9). `None` if the series is shorter than [`MACD_MIN_LEN`].
pub fn macd(data: &[Decimal]) -> Option<Macd> {
    if data.len() < MACD_MIN_LEN {
        return None;
    }
    let series = macd_series(data);
    let signal = ema(MACD_SIGNAL_PERIOD, &series)?;
    let macd = series.last().copied()?;
    Some(Macd {
        macd,
        signal,
        histogram: macd - signal,
    })
}

/// Wilder relative strength index.
///
/// Initial averages are taken over the first `period` deltas, then smoothed
/// with `avg = (avg * (period - 1) + delta) / period`. An all-gain window
/// (`avg_loss == 0`) is exactly 100.
pub fn rsi(period: usize, data: &[Decimal]) -> Option<Decimal> {
    if period == 0 || data.len() < period + 1 {
        return None;
    }

    let mut gains = Decimal::ZERO;
    let mut losses = Decimal::ZERO;
    for window in data[..period + 1].windows(2) {
        let delta = window[1] - window[0];
        if delta >= Decimal::ZERO {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    let divisor = Decimal::from(period as u64);
    let smoothing = Decimal::from(period as u64) - Decimal::ONE;
    let mut avg_gain = gains / divisor;
    let mut avg_loss = losses / divisor;

    for window in data[period..].windows(2) {
        let delta = window[1] - window[0];
        let (gain, loss) = if delta >= Decimal::ZERO {
            (delta, Decimal::ZERO)
        } else {
            (Decimal::ZERO, -delta)
        };
        avg_gain = (avg_gain * smoothing + gain) / divisor;
        avg_loss = (avg_loss * smoothing + loss) / divisor;
    }

    if avg_loss.is_zero() {
        return Some(Decimal::ONE_HUNDRED);
    }
    let rs = avg_gain / avg_loss;
    Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}

/// Latest Bollinger bands.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Bollinger {
    pub upper: Decimal,
    pub middle: Decimal,
    pub lower: Decimal,
}

/// Bollinger bands over the last `period` values: middle = SMA(period),
/// bands at `middle ± width * sigma` with sigma the population standard
/// deviation.
pub fn bollinger(period: usize, width: Decimal, data: &[Decimal]) -> Option<Bollinger> {
    if period == 0 || data.len() < period {
        return None;
    }
    let window = &data[data.len() - period..];
    let middle = mean(window);
    let variance = window
        .iter()
        .map(|value| {
            let deviation = value - middle;
            deviation * deviation
        })
        .sum::<Decimal>()
        / Decimal::from(period as u64);
    let sigma = variance.sqrt()?;
    Some(Bollinger {
        upper: middle + width * sigma,
        middle,
        lower: middle - width * sigma,
    })
}

/// Latest stochastic oscillator values. Either component is `None` when the
/// series is too short or every window it depends on is flat.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct Stochastic {
    pub k: Option<Decimal>,
    pub d: Option<Decimal>,
}

/// Stochastic oscillator: `%K = 100 * (close - low_n) / (high_n - low_n)`
/// per rolling window, `%D` the mean of the last `d_period` `%K` points.
///
/// A flat window (`high_n == low_n`) leaves that `%K` point undefined rather
/// than dividing by zero, and `%D` is undefined if any point it averages is.
pub fn stochastic(k_period: usize, d_period: usize, candles: &[Candle]) -> Stochastic {
    if k_period == 0 || d_period == 0 || candles.len() < k_period {
        return Stochastic::default();
    }

    let k_series: Vec<Option<Decimal>> = candles
        .windows(k_period)
        .map(|window| {
            let high = window.iter().map(|candle| candle.high).max()?;
            let low = window.iter().map(|candle| candle.low).min()?;
            if high == low {
                return None;
            }
            let close = window[window.len() - 1].close;
            Some(Decimal::ONE_HUNDRED * (close - low) / (high - low))
        })
        .collect();

    let k = k_series.last().copied().flatten();
    let d = if k_series.len() >= d_period {
        k_series[k_series.len() - d_period..]
            .iter()
            .copied()
            .collect::<Option<Vec<_>>>()
            .map(|points| mean(&points))
    } else {
        None
    };

    Stochastic { k, d }
}

/// Latest value of every indicator the engine computes. `None` marks an
/// indicator the series is too short (or too flat) to define - downstream
/// rules skip it rather than treating it as zero.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct IndicatorSet {
    pub sma20: Option<Decimal>,
    pub sma50: Option<Decimal>,
    pub ema12: Option<Decimal>,
    pub ema26: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub macd_hist: Option<Decimal>,
    pub rsi14: Option<Decimal>,
    pub bb_upper: Option<Decimal>,
    pub bb_middle: Option<Decimal>,
    pub bb_lower: Option<Decimal>,
    pub stoch_k: Option<Decimal>,
    pub stoch_d: Option<Decimal>,
}

impl IndicatorSet {
    /// Compute the full indicator set over `series` closing prices.
    pub fn compute(series: &CandleSeries) -> Self {
        let closes = series.closes();
        let macd = macd(&closes);
        let bands = bollinger(BOLLINGER_PERIOD, BOLLINGER_WIDTH, &closes);
        let stochastic = stochastic(STOCH_K_PERIOD, STOCH_D_PERIOD, series.candles());

        Self {
            sma20: sma(SMA_SHORT_PERIOD, &closes),
            sma50: sma(SMA_LONG_PERIOD, &closes),
            ema12: ema(EMA_FAST_PERIOD, &closes),
            ema26: ema(EMA_SLOW_PERIOD, &closes),
            macd: macd.map(|macd| macd.macd),
            macd_signal: macd.map(|macd| macd.signal),
            macd_hist: macd.map(|macd| macd.histogram),
            rsi14: rsi(RSI_PERIOD, &closes),
            bb_upper: bands.map(|bands| bands.upper),
            bb_middle: bands.map(|bands| bands.middle),
            bb_lower: bands.map(|bands| bands.lower),
            stoch_k: stochastic.k,
            stoch_d: stochastic.d,
        }
    }
}
