//! Monte Carlo resampling of an equity curve.
//!
//! Each run shuffles the equity levels themselves (not the returns), so the
//! first and last levels of a run are whichever values land there. The spread
//! of outcomes measures how much the reported CAGR depends on ordering.

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::QuantError;
use super::metrics::TRADING_DAYS_PER_YEAR;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloResult {
    pub median_cagr: f64,
    pub cagr_95th: f64,
    pub cagr_5th: f64,
    /// Fraction of runs with CAGR > 0.
    pub prob_profit: f64,
    /// Drawdown of the run at the 95th CAGR percentile.
    pub max_drawdown_95th: f64,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    cagr: f64,
    max_drawdown: f64,
}

pub fn monte_carlo_simulation<R>(
    equity_curve: &[f64],
    simulations: usize,
    rng: &mut R,
) -> Result<MonteCarloResult, QuantError>
where
    R: Rng + ?Sized,
{
    if equity_curve.is_empty() {
        return Err(QuantError::EmptyInput {
            context: "monte carlo equity curve",
        });
    }
    if simulations == 0 {
        return Err(QuantError::invalid_parameter(
            "simulations",
            "must be at least 1",
        ));
    }

    let exponent = TRADING_DAYS_PER_YEAR / equity_curve.len() as f64;
    let mut shuffled = equity_curve.to_vec();
    let mut runs = Vec::with_capacity(simulations);

    for _ in 0..simulations {
        shuffled.copy_from_slice(equity_curve);
        shuffled.shuffle(rng);

        let first = shuffled[0];
        let last = shuffled[shuffled.len() - 1];
        runs.push(Run {
            cagr: (last / first).powf(exponent) - 1.0,
            max_drawdown: run_drawdown(&shuffled),
        });
    }

    runs.sort_by(|a, b| a.cagr.total_cmp(&b.cagr));

    let at = |fraction: f64| runs[percentile_index(simulations, fraction)];
    let profitable = runs.iter().filter(|r| r.cagr > 0.0).count();

    let result = MonteCarloResult {
        median_cagr: at(0.5).cagr,
        cagr_95th: at(0.95).cagr,
        cagr_5th: at(0.05).cagr,
        prob_profit: profitable as f64 / simulations as f64,
        max_drawdown_95th: at(0.95).max_drawdown,
    };

    tracing::debug!(
        simulations,
        points = equity_curve.len(),
        median_cagr = result.median_cagr,
        prob_profit = result.prob_profit,
        "monte carlo complete"
    );

    Ok(result)
}

/// Peak starts at the first level.
fn run_drawdown(levels: &[f64]) -> f64 {
    let mut peak = levels[0];
    let mut max_dd = 0.0_f64;
    for &level in levels {
        peak = peak.max(level);
        max_dd = max_dd.min((level - peak) / peak);
    }
    max_dd
}

fn percentile_index(len: usize, fraction: f64) -> usize {
    ((len as f64 * fraction).floor() as usize).min(len - 1)
}
