//! Performance metrics and statistics.

use super::indicator::{mean, population_stddev};
use super::ohlcv::Bar;
use super::position::Trade;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// (final / initial)^(1 / years) - 1, or 0 when no time has elapsed.
pub fn cagr(final_value: f64, initial_value: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    (final_value / initial_value).powf(1.0 / years) - 1.0
}

/// Bar-over-bar returns of an equity curve. The first return is 0.
pub fn equity_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i == 0 {
                0.0
            } else {
                let prev = equity_curve[i - 1];
                (v - prev) / prev
            }
        })
        .collect()
}

/// Annualised Sharpe of an equity curve: mean*252 / (std*sqrt(252)).
///
/// No risk-free adjustment. 0 for an empty or flat curve.
pub fn equity_sharpe(equity_curve: &[f64]) -> f64 {
    let returns = equity_returns(equity_curve);
    let stddev = population_stddev(&returns);
    if stddev == 0.0 {
        return 0.0;
    }
    (mean(&returns) * TRADING_DAYS_PER_YEAR) / (stddev * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Deepest fall from the running peak, as a fraction `<= 0`.
///
/// The peak starts at `initial_peak` and rises with the curve.
pub fn max_drawdown(equity_curve: &[f64], initial_peak: f64) -> f64 {
    let mut peak = initial_peak;
    let mut max_dd = 0.0_f64;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            max_dd = max_dd.min((equity - peak) / peak);
        }
    }

    max_dd
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub wins: usize,
    pub losses: usize,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
}

impl TradeStats {
    pub fn compute(trades: &[Trade]) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;

        for trade in trades {
            if trade.is_win() {
                wins += 1;
                gross_profit += trade.profit;
            } else if trade.is_loss() {
                losses += 1;
                gross_loss += trade.profit.abs();
            }
        }

        let win_rate = if trades.is_empty() {
            0.0
        } else {
            wins as f64 / trades.len() as f64
        };

        let profit_factor = if gross_loss == 0.0 {
            f64::INFINITY
        } else {
            gross_profit / gross_loss
        };

        TradeStats {
            wins,
            losses,
            gross_profit,
            gross_loss,
            win_rate,
            profit_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpeOptions {
    /// Annual, as a decimal (0.02 for 2%).
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

impl Default for SharpeOptions {
    fn default() -> Self {
        SharpeOptions {
            risk_free_rate: 0.0,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Annualised Sharpe ratio of close-to-close returns.
///
/// Pairs with a non-positive price are skipped. `None` with fewer than two
/// bars, no usable returns, or zero volatility.
pub fn sharpe_ratio(bars: &[Bar], options: SharpeOptions) -> Option<f64> {
    if bars.len() < 2 {
        return None;
    }

    let returns: Vec<f64> = bars
        .windows(2)
        .filter(|w| w[0].close > 0.0 && w[1].close > 0.0)
        .map(|w| w[1].close / w[0].close - 1.0)
        .collect();

    if returns.is_empty() {
        return None;
    }

    let stddev = population_stddev(&returns);
    if stddev == 0.0 {
        return None;
    }

    let mean_annual = mean(&returns) * options.periods_per_year;
    let std_annual = stddev * options.periods_per_year.sqrt();
    Some((mean_annual - options.risk_free_rate) / std_annual)
}
