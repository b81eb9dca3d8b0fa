//! RSI (Relative Strength Index) using Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: rs is taken as 100.
//!
//! Warmup: first n values are NaN. A series of n values or fewer is all NaN.

use crate::domain::error::{ensure_period, QuantError};

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<f64>, QuantError> {
    ensure_period("period", period)?;
    Ok(rsi_values(closes, period))
}

pub(crate) fn rsi_values(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.len() <= period {
        return vec![f64::NAN; closes.len()];
    }

    let mut values = vec![f64::NAN; period];
    values.reserve(closes.len() - period);

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    values.push(rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}
