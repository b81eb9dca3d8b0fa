#![allow(dead_code)]

use chrono::NaiveDate;
use quantkit::domain::error::QuantError;
pub use quantkit::domain::ohlcv::Bar;
use quantkit::domain::ohlcv::date_to_millis;
use quantkit::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, QuantError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> Bar {
    let day = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    Bar {
        timestamp: date_to_millis(day),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// Daily bars from `closes`, one calendar day apart starting 2015-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = date(2015, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: date_to_millis(start + chrono::Duration::days(i as i64)),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 50_000.0,
        })
        .collect()
}

/// Linear ramp from `start_price`, one point per bar.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<Bar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| Bar {
            timestamp: date_to_millis(start + chrono::Duration::days(i as i64)),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000.0,
        })
        .collect()
}

/// Gentle uptrend with a ~94-bar cycle. A 10/30 dual MA crosses on every
/// cycle with enough margin to pass the golden-cross gain filter.
pub fn cyclical_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            100.0 + t * 0.02 + (t / 15.0).sin() * 10.0
        })
        .collect()
}

/// Write `<dir>/<symbol>.csv` in the adapter's format.
pub fn write_csv(dir: &std::path::Path, symbol: &str, bars: &[Bar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
