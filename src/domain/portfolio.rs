//! Single cash/position account driven by the backtester.
//!
//! Long only, one position at a time, always fully invested on entry and
//! fully closed on exit. Each leg pays 20 basis points.

use super::position::{Position, Trade};
use super::signal::transaction_cost;

/// Cash must exceed this before a new position is opened.
pub const MIN_CASH_TO_BUY: f64 = 1_000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered { shares: u64, cost: f64 },
    AlreadyInvested,
    InsufficientCapital,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub cash: f64,
    pub initial_cash: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
}

impl Account {
    pub fn new(initial_cash: f64) -> Self {
        Account {
            cash: initial_cash,
            initial_cash,
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn shares(&self) -> u64 {
        self.position.map_or(0, |p| p.shares)
    }

    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.shares() as f64 * price
    }

    pub fn record_equity(&mut self, price: f64) {
        let equity = self.equity(price);
        self.equity_curve.push(equity);
    }

    /// Spend all cash (less the entry cost) on whole shares.
    pub fn enter_long(&mut self, price: f64, timestamp: i64) -> EntryResult {
        if self.position.is_some() {
            return EntryResult::AlreadyInvested;
        }
        if self.cash <= MIN_CASH_TO_BUY || price <= 0.0 {
            return EntryResult::InsufficientCapital;
        }

        let cost = transaction_cost(self.cash);
        let shares = ((self.cash - cost) / price).floor() as u64;
        if shares == 0 {
            return EntryResult::InsufficientCapital;
        }

        self.cash -= shares as f64 * price + cost;
        self.position = Some(Position {
            shares,
            entry_price: price,
            entry_timestamp: timestamp,
        });
        EntryResult::Entered { shares, cost }
    }

    /// Sell the whole position, returning the recorded trade.
    pub fn exit_long(&mut self, price: f64, timestamp: i64) -> Option<&Trade> {
        let position = self.position.take()?;

        let revenue = position.market_value(price);
        let cost = transaction_cost(revenue);
        let profit = revenue - cost - position.cost_basis();

        self.cash += revenue - cost;
        self.trades.push(Trade {
            entry_timestamp: position.entry_timestamp,
            exit_timestamp: timestamp,
            entry_price: position.entry_price,
            exit_price: price,
            shares: position.shares,
            profit,
            return_pct: profit / position.cost_basis(),
        });
        self.trades.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new_account_is_all_cash() {
        let account = Account::new(10_000.0);
        assert_eq!(account.shares(), 0);
        assert_eq!(account.equity(123.0), 10_000.0);
        assert!(account.trades.is_empty());
        assert!(account.equity_curve.is_empty());
    }

    #[test]
    fn enter_long_sizes_whole_shares_after_cost() {
        let mut account = Account::new(10_000.0);
        let result = account.enter_long(100.0, 7);

        // cost = 20, floor(9980 / 100) = 99 shares
        assert_eq!(
            result,
            EntryResult::Entered {
                shares: 99,
                cost: 20.0
            }
        );
        assert_abs_diff_eq!(account.cash, 10_000.0 - 9_900.0 - 20.0, epsilon = 1e-9);
        let position = account.position.unwrap();
        assert_eq!(position.entry_timestamp, 7);
        assert_eq!(position.entry_price, 100.0);
    }

    #[test]
    fn enter_long_refuses_pyramiding() {
        let mut account = Account::new(10_000.0);
        account.enter_long(100.0, 0);
        assert_eq!(account.enter_long(100.0, 1), EntryResult::AlreadyInvested);
        assert_eq!(account.shares(), 99);
    }

    #[test]
    fn enter_long_requires_more_than_minimum_cash() {
        let mut account = Account::new(1_000.0);
        assert_eq!(
            account.enter_long(10.0, 0),
            EntryResult::InsufficientCapital
        );
        assert_eq!(account.cash, 1_000.0);
    }

    #[test]
    fn enter_long_price_above_cash_buys_nothing() {
        let mut account = Account::new(5_000.0);
        assert_eq!(
            account.enter_long(10_000.0, 0),
            EntryResult::InsufficientCapital
        );
        assert_eq!(account.cash, 5_000.0);
        assert!(account.position.is_none());
    }

    #[test]
    fn exit_long_records_trade_net_of_cost() {
        let mut account = Account::new(10_000.0);
        account.enter_long(100.0, 1);
        let trade = account.exit_long(110.0, 2).cloned().unwrap();

        let revenue = 99.0 * 110.0;
        let cost = revenue * 0.002;
        assert_abs_diff_eq!(trade.profit, revenue - cost - 9_900.0, epsilon = 1e-9);
        assert_abs_diff_eq!(trade.return_pct, trade.profit / 9_900.0, epsilon = 1e-12);
        assert_eq!(trade.entry_timestamp, 1);
        assert_eq!(trade.exit_timestamp, 2);
        assert_eq!(account.shares(), 0);
        assert_abs_diff_eq!(account.cash, 80.0 + revenue - cost, epsilon = 1e-9);
    }

    #[test]
    fn exit_without_position_is_noop() {
        let mut account = Account::new(10_000.0);
        assert!(account.exit_long(100.0, 0).is_none());
        assert!(account.trades.is_empty());
    }

    #[test]
    fn record_equity_marks_to_market() {
        let mut account = Account::new(10_000.0);
        account.enter_long(100.0, 0);
        account.record_equity(120.0);
        assert_abs_diff_eq!(account.equity_curve[0], 80.0 + 99.0 * 120.0, epsilon = 1e-9);
    }
}
