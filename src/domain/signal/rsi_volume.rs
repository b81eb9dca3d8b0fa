//! RSI with a volume-surge filter, intended for daily bars.

use crate::domain::error::{ensure_period, QuantError};
use crate::domain::indicator::last_or_nan;
use crate::domain::indicator::rsi::{rsi_values, DEFAULT_RSI_PERIOD};
use crate::domain::ohlcv::Bar;
use crate::domain::signal::{log_cost_estimate, SignalResult};

pub const DEFAULT_OVERBOUGHT: f64 = 65.0;
pub const DEFAULT_OVERSOLD: f64 = 35.0;

const VOLUME_WINDOW: usize = 20;
const VOLUME_SURGE: f64 = 1.5;
/// Minimum one-bar rebound potential, in percent.
const MIN_POTENTIAL_GAIN_PCT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiVolumeFilter {
    rsi_period: usize,
    overbought: f64,
    oversold: f64,
}

impl Default for RsiVolumeFilter {
    fn default() -> Self {
        RsiVolumeFilter {
            rsi_period: DEFAULT_RSI_PERIOD,
            overbought: DEFAULT_OVERBOUGHT,
            oversold: DEFAULT_OVERSOLD,
        }
    }
}

impl RsiVolumeFilter {
    pub fn new(rsi_period: usize, overbought: f64, oversold: f64) -> Result<Self, QuantError> {
        ensure_period("rsi_period", rsi_period)?;
        if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
            return Err(QuantError::invalid_parameter(
                "rsi thresholds",
                "overbought and oversold must lie within 0..=100",
            ));
        }
        if oversold >= overbought {
            return Err(QuantError::invalid_parameter(
                "rsi thresholds",
                format!("oversold ({oversold}) must be below overbought ({overbought})"),
            ));
        }
        Ok(RsiVolumeFilter {
            rsi_period,
            overbought,
            oversold,
        })
    }

    pub fn min_bars(&self) -> usize {
        self.rsi_period + VOLUME_WINDOW
    }

    pub fn evaluate(&self, bars: &[Bar]) -> SignalResult {
        if bars.len() < self.min_bars() {
            return SignalResult::insufficient("Not enough data");
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let current_rsi = last_or_nan(&rsi_values(&closes, self.rsi_period));

        let recent = &bars[bars.len() - VOLUME_WINDOW..];
        let avg_volume = recent.iter().map(|b| b.volume).sum::<f64>() / VOLUME_WINDOW as f64;
        let current_volume = bars[bars.len() - 1].volume;
        let price = closes[closes.len() - 1];
        log_cost_estimate("rsi_volume", price);

        if current_rsi < self.oversold && current_volume > avg_volume * VOLUME_SURGE {
            let previous = closes[closes.len() - 2];
            let potential_gain = (previous - price) / price * 100.0;
            if potential_gain > MIN_POTENTIAL_GAIN_PCT {
                return SignalResult::buy(0.7, "Oversold + volume surge");
            }
        }

        if current_rsi > self.overbought {
            return SignalResult::sell(0.7, "Overbought");
        }

        SignalResult::hold(0.5, "Neutral")
    }
}
