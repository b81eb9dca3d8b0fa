//! Anchored walk-forward analysis.
//!
//! Every in-sample window starts at bar 0 and grows by `out_sample_years` per
//! fold. The out-sample window follows it directly and is seeded with the
//! in-sample final value.

use super::backtest::{run_backtest, BacktestConfig, BacktestResult};
use super::error::QuantError;
use super::metrics::TRADING_DAYS_PER_YEAR;
use super::ohlcv::Bar;
use super::signal::SignalFn;

/// Denominator used when the in-sample CAGR is zero or undefined.
const ROBUSTNESS_FLOOR: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkForwardConfig {
    pub in_sample_years: f64,
    pub out_sample_years: f64,
    pub initial_cash: f64,
    pub weekly: bool,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        WalkForwardConfig {
            in_sample_years: 5.0,
            out_sample_years: 1.0,
            initial_cash: 10_000.0,
            weekly: true,
        }
    }
}

impl WalkForwardConfig {
    pub fn validate(&self) -> Result<(), QuantError> {
        for (name, years) in [
            ("in_sample_years", self.in_sample_years),
            ("out_sample_years", self.out_sample_years),
        ] {
            if !years.is_finite() || years <= 0.0 {
                return Err(QuantError::invalid_parameter(
                    name,
                    format!("must be positive and finite, got {years}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardResult {
    pub in_sample: BacktestResult,
    pub out_sample: BacktestResult,
    /// Out-sample CAGR over in-sample CAGR.
    pub robustness: f64,
}

pub fn robustness(in_sample_cagr: f64, out_sample_cagr: f64) -> f64 {
    let denominator = if in_sample_cagr == 0.0 || in_sample_cagr.is_nan() {
        ROBUSTNESS_FLOOR
    } else {
        in_sample_cagr
    };
    out_sample_cagr / denominator
}

/// Run one fold per out-sample period that fits in `bars`.
///
/// Returns an empty list when the series is shorter than one in-sample plus
/// one out-sample period.
pub fn walk_forward_backtest<S>(
    bars: &[Bar],
    signal_fn: &S,
    config: &WalkForwardConfig,
) -> Result<Vec<WalkForwardResult>, QuantError>
where
    S: SignalFn + ?Sized,
{
    config.validate()?;
    BacktestConfig {
        initial_cash: config.initial_cash,
        weekly: config.weekly,
    }
    .validate()?;

    let total_years = bars.len() as f64 / TRADING_DAYS_PER_YEAR;
    let mut results = Vec::new();
    let mut start = 0.0;

    while start + config.in_sample_years + config.out_sample_years <= total_years {
        let in_end = year_to_index(start + config.in_sample_years, bars.len());
        let out_end = year_to_index(
            start + config.in_sample_years + config.out_sample_years,
            bars.len(),
        );

        let in_sample = run_backtest(
            &bars[..in_end],
            signal_fn,
            &BacktestConfig {
                initial_cash: config.initial_cash,
                weekly: config.weekly,
            },
        )?;

        // An exhausted in-sample account cannot seed the out-sample run.
        if in_sample.final_value <= 0.0 {
            tracing::warn!(fold = results.len(), "in-sample account exhausted, stopping");
            break;
        }

        let out_sample = run_backtest(
            &bars[in_end..out_end],
            signal_fn,
            &BacktestConfig {
                initial_cash: in_sample.final_value,
                weekly: config.weekly,
            },
        )?;

        let robustness = robustness(in_sample.cagr, out_sample.cagr);
        tracing::debug!(
            fold = results.len(),
            in_bars = in_end,
            out_bars = out_end - in_end,
            in_cagr = in_sample.cagr,
            out_cagr = out_sample.cagr,
            robustness,
            "walk-forward fold complete"
        );

        results.push(WalkForwardResult {
            in_sample,
            out_sample,
            robustness,
        });
        start += config.out_sample_years;
    }

    Ok(results)
}

fn year_to_index(years: f64, len: usize) -> usize {
    ((years * TRADING_DAYS_PER_YEAR).floor() as usize).min(len)
}
