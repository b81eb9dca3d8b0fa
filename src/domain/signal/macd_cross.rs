//! MACD zero-line cross, intended for weekly closes.
//!
//! Only the MACD line's sign change drives the decision; the signal line is
//! available from [`crate::domain::indicator::macd`] but is not compared here.

use crate::domain::indicator::macd::macd_line;
use crate::domain::signal::{log_cost_estimate, SignalFn, SignalResult};

pub const MIN_BARS: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacdCross;

impl MacdCross {
    pub fn evaluate(&self, closes: &[f64]) -> SignalResult {
        if closes.len() < MIN_BARS {
            return SignalResult::insufficient("Not enough data");
        }

        let line = macd_line(closes);
        let current = line[line.len() - 1];
        let prev = line[line.len() - 2];
        log_cost_estimate("macd", closes[closes.len() - 1]);

        if current > 0.0 && prev <= 0.0 {
            return SignalResult::buy(0.75, "MACD bullish cross");
        }
        if current < 0.0 && prev >= 0.0 {
            return SignalResult::sell(0.75, "MACD bearish cross");
        }

        SignalResult::hold(0.6, "MACD neutral")
    }
}

impl SignalFn for MacdCross {
    fn signal(&self, closes: &[f64]) -> SignalResult {
        self.evaluate(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::domain::signal::Signal;

    #[test]
    fn not_enough_data() {
        let result = MacdCross.evaluate(&vec![100.0; 49]);
        assert_eq!(result.signal, Signal::Hold);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.reason, "Not enough data");
    }

    #[test]
    fn flat_then_jump_is_bullish_cross() {
        // A flat series has a zero MACD line; a jump pushes the fast EMA above
        // the slow one.
        let mut closes = vec![100.0; 50];
        closes.push(120.0);
        let result = MacdCross.evaluate(&closes);
        assert_eq!(result.signal, Signal::Buy);
        assert_eq!(result.reason, "MACD bullish cross");
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn flat_then_drop_is_bearish_cross() {
        let mut closes = vec![100.0; 50];
        closes.push(80.0);
        let result = MacdCross.evaluate(&closes);
        assert_eq!(result.signal, Signal::Sell);
        assert_eq!(result.reason, "MACD bearish cross");
    }

    #[test]
    fn sustained_uptrend_is_neutral() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = MacdCross.evaluate(&closes);
        assert_eq!(result.signal, Signal::Hold);
        assert_eq!(result.reason, "MACD neutral");
        assert_eq!(result.confidence, 0.6);
    }

    proptest! {
        #[test]
        fn evaluation_is_idempotent(closes in prop::collection::vec(1.0f64..500.0, 0..150)) {
            prop_assert_eq!(MacdCross.evaluate(&closes), MacdCross.evaluate(&closes));
        }
    }
}
