//! Rule-based trading signal generators.
//!
//! Each generator is a textbook heuristic built on the indicator library.
//! Generators never fail on short input: they return a zero-confidence `Hold`
//! with an explanatory reason instead.
//!
//! A flat-fee broker cost of 20 basis points per leg is estimated for each
//! single-series decision and logged at trace level. It is not subtracted from
//! any threshold, so `cost_adjusted` is always `false`.

pub mod donchian;
pub mod dual_ma;
pub mod macd_cross;
pub mod resample;
pub mod rotation;
pub mod rsi_volume;

pub use donchian::DonchianBreakout;
pub use dual_ma::DualMaCrossover;
pub use macd_cross::MacdCross;
pub use resample::resample_to_weekly_closes;
pub use rotation::{momentum_return, rotation_signal, MomentumEntry, RotationSignal};
pub use rsi_volume::RsiVolumeFilter;

use std::fmt;

/// Cost per leg as a fraction of traded value ($2 per $1,000).
pub const COST_RATE: f64 = 0.002;

/// Nominal parcel size used for the informational cost estimate.
const ESTIMATE_UNITS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalResult {
    pub signal: Signal,
    /// 0..=1
    pub confidence: f64,
    pub reason: String,
    pub cost_adjusted: bool,
}

impl SignalResult {
    pub fn new(signal: Signal, confidence: f64, reason: impl Into<String>) -> Self {
        SignalResult {
            signal,
            confidence,
            reason: reason.into(),
            cost_adjusted: false,
        }
    }

    pub fn buy(confidence: f64, reason: impl Into<String>) -> Self {
        Self::new(Signal::Buy, confidence, reason)
    }

    pub fn sell(confidence: f64, reason: impl Into<String>) -> Self {
        Self::new(Signal::Sell, confidence, reason)
    }

    pub fn hold(confidence: f64, reason: impl Into<String>) -> Self {
        Self::new(Signal::Hold, confidence, reason)
    }

    /// Zero-confidence hold for input shorter than a generator's window.
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::hold(0.0, reason)
    }
}

/// Anything that turns a trailing window of closes into a signal.
///
/// Implemented for plain closures and for the closes-only generators, so any
/// of them can drive the backtester.
pub trait SignalFn {
    fn signal(&self, closes: &[f64]) -> SignalResult;
}

impl<F> SignalFn for F
where
    F: Fn(&[f64]) -> SignalResult,
{
    fn signal(&self, closes: &[f64]) -> SignalResult {
        self(closes)
    }
}

/// Broker cost for trading `amount` worth of stock.
pub fn transaction_cost(amount: f64) -> f64 {
    amount * COST_RATE
}

pub(crate) fn log_cost_estimate(generator: &'static str, price: f64) {
    let cost = transaction_cost(price * ESTIMATE_UNITS);
    tracing::trace!(generator, price, cost, "estimated trading cost");
}
