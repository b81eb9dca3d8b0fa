//! OHLCV bar representation.
//!
//! Timestamps are epoch milliseconds for every series in the crate.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::error::QuantError;

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// (close - open) / open, or 0 when the bar opened at zero.
    pub fn pct_change(&self) -> f64 {
        if self.open == 0.0 {
            return 0.0;
        }
        (self.close - self.open) / self.open
    }

    pub fn datetime(&self) -> Result<DateTime<Utc>, QuantError> {
        DateTime::from_timestamp_millis(self.timestamp)
            .ok_or(QuantError::InvalidTimestamp(self.timestamp))
    }
}

/// Epoch milliseconds at UTC midnight of `date`.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
