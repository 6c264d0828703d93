#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! Technical analysis engine for candle data.
//!
//! Given a validated window of OHLCV candles, [`AnalysisEngine`] computes a
//! fixed set of indicators, detects candlestick patterns, extracts
//! support/resistance levels, synthesizes trade signals and classifies the
//! overall trend. The engine is stateless and performs no I/O - fetching
//! candles and rendering results belong to the caller.

pub mod candle;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod levels;
pub mod patterns;
pub mod signals;
pub mod trend;

pub use candle::{Candle, CandleSeries, Interval};
pub use engine::{AnalysisConfig, AnalysisEngine, AnalysisResult};
pub use error::AnalysisError;
