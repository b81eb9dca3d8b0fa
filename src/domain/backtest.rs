//! Single-pass backtest over one price series.
//!
//! The signal function sees an expanding window of closes ending at the
//! current bar. Nothing trades before [`WARMUP_BARS`], so shorter series
//! return an untouched account.

use super::error::QuantError;
use super::metrics::{self, TradeStats, TRADING_DAYS_PER_YEAR};
use super::ohlcv::{closes, Bar};
use super::portfolio::{Account, EntryResult};
use super::position::Trade;
use super::signal::{Signal, SignalFn};

/// First bar index the simulation evaluates.
pub const WARMUP_BARS: usize = 200;
/// Bars per step in weekly mode.
pub const WEEKLY_STEP: usize = 5;

const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    /// Step five bars at a time instead of one.
    pub weekly: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 10_000.0,
            weekly: true,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), QuantError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(QuantError::invalid_parameter(
                "initial_cash",
                format!("must be positive and finite, got {}", self.initial_cash),
            ));
        }
        Ok(())
    }

    fn step(&self) -> usize {
        if self.weekly { WEEKLY_STEP } else { 1 }
    }

    /// Years spanned by `bars` bars. Weekly mode divides by a further 52.
    fn years(&self, bars: usize) -> f64 {
        let years = bars as f64 / TRADING_DAYS_PER_YEAR;
        if self.weekly {
            years / WEEKS_PER_YEAR
        } else {
            years
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_cash: f64,
    pub final_value: f64,
    pub cagr: f64,
    /// Fraction `<= 0`.
    pub max_drawdown: f64,
    pub sharpe: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
}

pub fn run_backtest<S>(
    bars: &[Bar],
    signal_fn: &S,
    config: &BacktestConfig,
) -> Result<BacktestResult, QuantError>
where
    S: SignalFn + ?Sized,
{
    config.validate()?;

    let closes = closes(bars);
    let mut account = Account::new(config.initial_cash);

    for i in (WARMUP_BARS..bars.len()).step_by(config.step()) {
        let bar = &bars[i];
        let signal = signal_fn.signal(&closes[..=i]);
        account.record_equity(bar.close);

        match signal.signal {
            Signal::Buy => {
                if let EntryResult::Entered { shares, cost } =
                    account.enter_long(bar.close, bar.timestamp)
                {
                    tracing::debug!(index = i, shares, price = bar.close, cost, "entered long");
                }
            }
            Signal::Sell => {
                if let Some(trade) = account.exit_long(bar.close, bar.timestamp) {
                    tracing::debug!(
                        index = i,
                        shares = trade.shares,
                        price = bar.close,
                        profit = trade.profit,
                        "exited long"
                    );
                }
            }
            Signal::Hold => {}
        }
    }

    let last_close = closes.last().copied().unwrap_or_default();
    let final_value = account.equity(last_close);
    let years = config.years(bars.len());
    let stats = TradeStats::compute(&account.trades);

    let result = BacktestResult {
        initial_cash: config.initial_cash,
        final_value,
        cagr: metrics::cagr(final_value, config.initial_cash, years),
        max_drawdown: metrics::max_drawdown(&account.equity_curve, config.initial_cash),
        sharpe: metrics::equity_sharpe(&account.equity_curve),
        win_rate: stats.win_rate,
        profit_factor: stats.profit_factor,
        trades: account.trades,
        equity_curve: account.equity_curve,
    };

    tracing::debug!(
        bars = bars.len(),
        trades = result.trades.len(),
        final_value = result.final_value,
        cagr = result.cagr,
        "backtest complete"
    );

    Ok(result)
}
