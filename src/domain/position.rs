//! Open position and closed trade records.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub shares: u64,
    pub entry_price: f64,
    pub entry_timestamp: i64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.entry_price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.market_value(price) - self.cost_basis()
    }
}

/// A round trip, recorded when a position is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_timestamp: i64,
    pub exit_timestamp: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: u64,
    /// Net of the exit leg's cost.
    pub profit: f64,
    /// `profit` over the entry cost basis.
    pub return_pct: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }
}
