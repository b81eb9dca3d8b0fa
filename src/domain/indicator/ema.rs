//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = v[i]*k + EMA[i-1]*(1-k).
//! No warmup: every position holds a value.

use crate::domain::error::{ensure_period, QuantError};

pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>, QuantError> {
    ensure_period("period", period)?;
    Ok(ema_values(values, period))
}

pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = seed;
    result.push(seed);

    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        result.push(prev);
    }

    result
}
