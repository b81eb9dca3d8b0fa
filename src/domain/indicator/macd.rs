//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow), NaN until index (slow - 1)
//! Signal Line = EMA(signal) over the valid part of the MACD line
//!
//! Both EMAs are seeded from the first close, so the line is only trusted once
//! the slow EMA has seen `slow` values.

use crate::domain::indicator::ema::ema_values;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    pub fn histogram(&self) -> Vec<f64> {
        self.line
            .iter()
            .zip(&self.signal)
            .map(|(line, signal)| line - signal)
            .collect()
    }
}

/// MACD(12, 26, 9).
pub fn macd(values: &[f64]) -> MacdSeries {
    let line = macd_line(values);
    let warmup = DEFAULT_SLOW - 1;

    let mut signal = vec![f64::NAN; values.len()];
    if values.len() > warmup {
        let smoothed = ema_values(&line[warmup..], DEFAULT_SIGNAL);
        signal[warmup..].copy_from_slice(&smoothed);
    }

    MacdSeries { line, signal }
}

pub(crate) fn macd_line(values: &[f64]) -> Vec<f64> {
    let ema_fast = ema_values(values, DEFAULT_FAST);
    let ema_slow = ema_values(values, DEFAULT_SLOW);
    let warmup = DEFAULT_SLOW - 1;

    ema_fast
        .iter()
        .zip(&ema_slow)
        .enumerate()
        .map(|(i, (fast, slow))| if i >= warmup { fast - slow } else { f64::NAN })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_warmup() {
        let series = macd(&rising(40));
        for i in 0..25 {
            assert!(series.line[i].is_nan(), "line index {} should be NaN", i);
            assert!(series.signal[i].is_nan(), "signal index {} should be NaN", i);
        }
        assert!(!series.line[25].is_nan());
        assert!(!series.signal[25].is_nan());
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let values = rising(40);
        let series = macd(&values);
        let fast = ema_values(&values, 12);
        let slow = ema_values(&values, 26);
        for i in 25..40 {
            assert!((series.line[i] - (fast[i] - slow[i])).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn macd_signal_seeded_from_first_valid_line_value() {
        let series = macd(&rising(40));
        assert_eq!(series.signal[25], series.line[25]);
    }

    #[test]
    fn macd_rising_prices_positive_line() {
        let series = macd(&rising(60));
        assert!(series.line[59] > 0.0);
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let series = macd(&rising(40));
        let histogram = series.histogram();
        for i in 25..40 {
            assert!((histogram[i] - (series.line[i] - series.signal[i])).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn macd_short_series_all_nan() {
        let series = macd(&rising(20));
        assert_eq!(series.line.len(), 20);
        assert!(series.line.iter().all(|v| v.is_nan()));
        assert!(series.signal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn macd_empty() {
        let series = macd(&[]);
        assert!(series.line.is_empty());
        assert!(series.signal.is_empty());
    }

    fn bits(series: &[f64]) -> Vec<u64> {
        series.iter().map(|v| v.to_bits()).collect()
    }

    proptest! {
        #[test]
        fn macd_is_idempotent(values in prop::collection::vec(1.0f64..500.0, 0..120)) {
            let a = macd(&values);
            let b = macd(&values);
            prop_assert_eq!(bits(&a.line), bits(&b.line));
            prop_assert_eq!(bits(&a.signal), bits(&b.signal));
            prop_assert_eq!(bits(&a.histogram()), bits(&b.histogram()));
        }
    }
}
