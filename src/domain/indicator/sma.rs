//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(v[i-n+1..=i]). Warmup: first (n-1) values are NaN.

use crate::domain::error::{ensure_period, QuantError};

pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>, QuantError> {
    ensure_period("period", period)?;
    Ok(sma_values(values, period))
}

pub(crate) fn sma_values(values: &[f64], period: usize) -> Vec<f64> {
    let warmup = period - 1;
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i < warmup {
                f64::NAN
            } else {
                let window = &values[i + 1 - period..=i];
                window.iter().sum::<f64>() / period as f64
            }
        })
        .collect()
}

/// Last value of `sma_values` without building the series. `NaN` when
/// `values` is shorter than `period`.
pub(crate) fn sma_last(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return f64::NAN;
    }
    let window = &values[values.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sma_known_values() {
        let series = sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3).unwrap();
        assert_eq!(series.len(), 5);
        assert!(series[0].is_nan());
        assert!(series[1].is_nan());
        assert_eq!(&series[2..], &[20.0, 30.0, 40.0]);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let values = [3.5, 1.25, 9.0, 4.0];
        assert_eq!(sma(&values, 1).unwrap(), values.to_vec());
    }

    #[test]
    fn sma_period_longer_than_series() {
        let series = sma(&[1.0, 2.0, 3.0], 5).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_empty() {
        assert!(sma(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn sma_last_matches_series_tail() {
        let values: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).sin() * 10.0 + 50.0).collect();
        for period in [1, 3, 10, 40] {
            let series = sma_values(&values, period);
            assert_eq!(sma_last(&values, period), series[series.len() - 1]);
        }
        assert!(sma_last(&values, 41).is_nan());
        assert!(sma_last(&[], 1).is_nan());
    }

    #[test]
    fn sma_period_0() {
        assert!(matches!(
            sma(&[1.0, 2.0], 0),
            Err(QuantError::InvalidPeriod { value: 0, .. })
        ));
    }

    proptest! {
        #[test]
        fn sma_is_idempotent(
            values in prop::collection::vec(1.0f64..500.0, 0..120),
            period in 1usize..30,
        ) {
            let a = sma(&values, period).unwrap();
            let b = sma(&values, period).unwrap();
            // Bitwise, so warmup NaNs compare equal.
            prop_assert_eq!(bits(&a), bits(&b));
        }
    }

    fn bits(series: &[f64]) -> Vec<u64> {
        series.iter().map(|v| v.to_bits()).collect()
    }
}
