//! Price data access port trait.

use crate::domain::error::QuantError;
use crate::domain::ohlcv::Bar;

pub trait DataPort {
    /// All bars for `symbol`, ascending by timestamp.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, QuantError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantError>;
}
