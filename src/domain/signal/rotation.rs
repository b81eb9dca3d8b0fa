//! Cross-asset rotation by momentum.
//!
//! Ranks a basket by trailing return: the strongest names are bought, the
//! weakest sold, the middle held. Ranking uses a stable sort, so equal returns
//! keep their input order. When the top and bottom sets overlap (a basket
//! smaller than `top_count + bottom_count`), a symbol in both is a buy.

use crate::domain::ohlcv::Bar;
use crate::domain::signal::SignalResult;

pub const DEFAULT_TOP_COUNT: usize = 3;
pub const DEFAULT_BOTTOM_COUNT: usize = 3;

const ROTATION_CONFIDENCE: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumEntry {
    pub symbol: String,
    pub returns_m: f64,
}

impl MomentumEntry {
    pub fn new(symbol: impl Into<String>, returns_m: f64) -> Self {
        MomentumEntry {
            symbol: symbol.into(),
            returns_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationSignal {
    pub symbol: String,
    pub signal: SignalResult,
}

/// One signal per entry, in input order.
pub fn rotation_signal(
    entries: &[MomentumEntry],
    top_count: usize,
    bottom_count: usize,
) -> Vec<RotationSignal> {
    let mut ranked: Vec<&MomentumEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| b.returns_m.total_cmp(&a.returns_m));

    let top: Vec<&str> = ranked
        .iter()
        .take(top_count)
        .map(|e| e.symbol.as_str())
        .collect();
    let bottom: Vec<&str> = ranked
        .iter()
        .skip(ranked.len().saturating_sub(bottom_count))
        .map(|e| e.symbol.as_str())
        .collect();

    entries
        .iter()
        .map(|entry| {
            let pct = format_percent(entry.returns_m);
            let signal = if top.contains(&entry.symbol.as_str()) {
                SignalResult::buy(
                    ROTATION_CONFIDENCE,
                    format!("Top {top_count} returns @ {pct}."),
                )
            } else if bottom.contains(&entry.symbol.as_str()) {
                SignalResult::sell(
                    ROTATION_CONFIDENCE,
                    format!("Bottom {bottom_count} returns @ {pct}."),
                )
            } else {
                SignalResult::hold(ROTATION_CONFIDENCE, format!("Mid returns @ {pct}."))
            };
            RotationSignal {
                symbol: entry.symbol.clone(),
                signal,
            }
        })
        .collect()
}

/// Close-to-close return over the trailing `lookback` bars.
///
/// `None` when the series is too short or the base close is zero.
pub fn momentum_return(bars: &[Bar], lookback: usize) -> Option<f64> {
    if bars.len() <= lookback {
        return None;
    }
    let last = bars[bars.len() - 1].close;
    let base = bars[bars.len() - 1 - lookback].close;
    if base == 0.0 {
        return None;
    }
    Some(last / base - 1.0)
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
