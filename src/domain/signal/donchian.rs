//! Donchian channel breakout over the trailing closes, excluding the current one.

use crate::domain::error::{ensure_period, QuantError};
use crate::domain::signal::{log_cost_estimate, SignalFn, SignalResult};

pub const DEFAULT_PERIOD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonchianBreakout {
    period: usize,
}

impl Default for DonchianBreakout {
    fn default() -> Self {
        DonchianBreakout {
            period: DEFAULT_PERIOD,
        }
    }
}

impl DonchianBreakout {
    pub fn new(period: usize) -> Result<Self, QuantError> {
        ensure_period("period", period)?;
        Ok(DonchianBreakout { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// (upper, lower) over the `period` values before the last one.
    pub fn channel(&self, closes: &[f64]) -> Option<(f64, f64)> {
        if closes.len() < self.period + 1 {
            return None;
        }
        let end = closes.len() - 1;
        let window = &closes[end - self.period..end];
        let upper = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lower = window.iter().copied().fold(f64::INFINITY, f64::min);
        Some((upper, lower))
    }

    pub fn evaluate(&self, closes: &[f64]) -> SignalResult {
        let Some((upper, lower)) = self.channel(closes) else {
            return SignalResult::insufficient("Not enough data");
        };

        let current = closes[closes.len() - 1];
        let prev = closes[closes.len() - 2];
        log_cost_estimate("donchian", current);

        if current > upper && prev <= upper {
            return SignalResult::buy(0.7, format!("{}W breakout", self.period));
        }
        if current < lower && prev >= lower {
            return SignalResult::sell(0.7, format!("{}W breakdown", self.period));
        }

        SignalResult::hold(0.5, "Inside channel")
    }
}

impl SignalFn for DonchianBreakout {
    fn signal(&self, closes: &[f64]) -> SignalResult {
        self.evaluate(closes)
    }
}
