//! Technical indicators over plain `f64` series.
//!
//! Every indicator returns a series the same length as its input, with `NaN`
//! marking warmup positions. Public entry points reject a zero period; the
//! `*_values` variants are for callers that already validated their periods.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::{rsi, DEFAULT_RSI_PERIOD};
pub use sma::sma;
pub use stddev::{mean, population_stddev};

/// Last element of a series, `NaN` when empty.
pub(crate) fn last_or_nan(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or(f64::NAN)
}
