//! Strategy selection for the closes-driven generators.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::QuantError;
use crate::domain::signal::{
    DonchianBreakout, DualMaCrossover, MacdCross, SignalFn, SignalResult,
};

/// A generator that can drive [`run_backtest`](crate::domain::backtest::run_backtest).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    DualMa(DualMaCrossover),
    Macd(MacdCross),
    Donchian(DonchianBreakout),
}

/// Strategy name as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    DualMa,
    Macd,
    Donchian,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::DualMa, StrategyKind::Macd, StrategyKind::Donchian];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::DualMa => "dual_ma",
            StrategyKind::Macd => "macd",
            StrategyKind::Donchian => "donchian",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = QuantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dual_ma" => Ok(StrategyKind::DualMa),
            "macd" => Ok(StrategyKind::Macd),
            "donchian" => Ok(StrategyKind::Donchian),
            other => Err(QuantError::invalid_parameter(
                "strategy",
                format!("unknown strategy '{other}', expected dual_ma, macd or donchian"),
            )),
        }
    }
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::DualMa(_) => StrategyKind::DualMa,
            Strategy::Macd(_) => StrategyKind::Macd,
            Strategy::Donchian(_) => StrategyKind::Donchian,
        }
    }

    pub fn evaluate(&self, closes: &[f64]) -> SignalResult {
        match self {
            Strategy::DualMa(g) => g.evaluate(closes),
            Strategy::Macd(g) => g.evaluate(closes),
            Strategy::Donchian(g) => g.evaluate(closes),
        }
    }
}

impl From<StrategyKind> for Strategy {
    /// Default parameters for each generator.
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::DualMa => Strategy::DualMa(DualMaCrossover::default()),
            StrategyKind::Macd => Strategy::Macd(MacdCross),
            StrategyKind::Donchian => Strategy::Donchian(DonchianBreakout::default()),
        }
    }
}

impl SignalFn for Strategy {
    fn signal(&self, closes: &[f64]) -> SignalResult {
        self.evaluate(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Signal;

    #[test]
    fn parse_kinds() {
        assert_eq!("dual_ma".parse::<StrategyKind>().unwrap(), StrategyKind::DualMa);
        assert_eq!(" MACD ".parse::<StrategyKind>().unwrap(), StrategyKind::Macd);
        assert_eq!("donchian".parse::<StrategyKind>().unwrap(), StrategyKind::Donchian);
    }

    #[test]
    fn parse_unknown_kind() {
        assert!(matches!(
            "rsi".parse::<StrategyKind>(),
            Err(QuantError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn display_round_trips() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn default_strategies_match_kind() {
        for kind in StrategyKind::ALL {
            assert_eq!(Strategy::from(kind).kind(), kind);
        }
    }

    #[test]
    fn dispatches_to_generator() {
        let strategy = Strategy::from(StrategyKind::DualMa);
        let result = strategy.signal(&[100.0; 10]);
        assert_eq!(result.signal, Signal::Hold);
        assert_eq!(result.reason, "Insufficient data");
    }
}
