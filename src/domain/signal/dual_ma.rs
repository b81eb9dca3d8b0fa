//! Dual moving-average crossover, intended for weekly closes.
//!
//! Buys on a golden cross (short SMA crossing above long SMA) when price sits
//! more than 0.5% above the long SMA; sells on a death cross.

use crate::domain::error::{ensure_period, QuantError};
use crate::domain::indicator::last_or_nan;
use crate::domain::indicator::sma::sma_last;
use crate::domain::signal::{log_cost_estimate, SignalFn, SignalResult};

pub const DEFAULT_SHORT_PERIOD: usize = 50;
pub const DEFAULT_LONG_PERIOD: usize = 200;

/// Minimum gain over the long SMA, in percent, for a golden cross to count.
const MIN_GAIN_PCT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualMaCrossover {
    short_period: usize,
    long_period: usize,
}

impl Default for DualMaCrossover {
    fn default() -> Self {
        DualMaCrossover {
            short_period: DEFAULT_SHORT_PERIOD,
            long_period: DEFAULT_LONG_PERIOD,
        }
    }
}

impl DualMaCrossover {
    pub fn new(short_period: usize, long_period: usize) -> Result<Self, QuantError> {
        ensure_period("short_period", short_period)?;
        ensure_period("long_period", long_period)?;
        if short_period >= long_period {
            return Err(QuantError::invalid_parameter(
                "short_period",
                format!("must be below long_period ({short_period} >= {long_period})"),
            ));
        }
        Ok(DualMaCrossover {
            short_period,
            long_period,
        })
    }

    pub fn short_period(&self) -> usize {
        self.short_period
    }

    pub fn long_period(&self) -> usize {
        self.long_period
    }

    pub fn evaluate(&self, closes: &[f64]) -> SignalResult {
        if closes.len() < self.long_period {
            return SignalResult::insufficient("Insufficient data");
        }

        let previous = &closes[..closes.len() - 1];
        let short_ma = sma_last(closes, self.short_period);
        let long_ma = sma_last(closes, self.long_period);
        let prev_short = sma_last(previous, self.short_period);
        let prev_long = sma_last(previous, self.long_period);

        let price = last_or_nan(closes);
        log_cost_estimate("dual_ma", price);

        if short_ma > long_ma && prev_short <= prev_long {
            let gain = (price - long_ma) / long_ma * 100.0;
            if gain > MIN_GAIN_PCT {
                return SignalResult::buy(0.8, "Golden cross");
            }
        }

        if short_ma < long_ma && prev_short >= prev_long {
            return SignalResult::sell(0.8, "Death cross");
        }

        SignalResult::hold(0.6, "Trending")
    }
}

impl SignalFn for DualMaCrossover {
    fn signal(&self, closes: &[f64]) -> SignalResult {
        self.evaluate(closes)
    }
}
