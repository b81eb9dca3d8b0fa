//! CSV file data adapter.
//!
//! One file per symbol at `<base>/<SYMBOL>.csv` with the header
//! `date,open,high,low,close,volume`. `date` is either `YYYY-MM-DD` (taken as
//! UTC midnight) or an integer epoch-millisecond timestamp.

use crate::domain::error::QuantError;
use crate::domain::ohlcv::{date_to_millis, Bar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const EXTENSION: &str = "csv";

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.{EXTENSION}"))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, QuantError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => QuantError::NoData {
                symbol: symbol.to_string(),
            },
            _ => QuantError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| QuantError::Data {
                reason: format!("{symbol}: CSV parse error: {e}"),
            })?;
            // Header is line 1.
            let line = row + 2;

            let timestamp = parse_timestamp(field(&record, 0, "date", symbol, line)?)
                .ok_or_else(|| QuantError::Data {
                    reason: format!(
                        "{symbol} line {line}: invalid date, expected YYYY-MM-DD or epoch milliseconds"
                    ),
                })?;

            bars.push(Bar {
                timestamp,
                open: parse_price(&record, 1, "open", symbol, line)?,
                high: parse_price(&record, 2, "high", symbol, line)?,
                low: parse_price(&record, 3, "low", symbol, line)?,
                close: parse_price(&record, 4, "close", symbol, line)?,
                volume: parse_price(&record, 5, "volume", symbol, line)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        tracing::debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QuantError::Data {
                reason: format!("directory entry error: {e}"),
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
    line: usize,
) -> Result<&'a str, QuantError> {
    record.get(index).ok_or_else(|| QuantError::Data {
        reason: format!("{symbol} line {line}: missing {name} column"),
    })
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
    line: usize,
) -> Result<f64, QuantError> {
    field(record, index, name, symbol, line)?
        .parse()
        .map_err(|e| QuantError::Data {
            reason: format!("{symbol} line {line}: invalid {name} value: {e}"),
        })
}

fn parse_timestamp(value: &str) -> Option<i64> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date_to_millis(date));
    }
    value.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("BHP.csv"), csv_content).unwrap();
        fs::write(path.join("CBA.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "not data").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("BHP").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, 1_705_276_800_000);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.0);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn fetch_bars_accepts_epoch_millis() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,open,high,low,close,volume\n1705276800000,1,2,0.5,1.5,10\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_bars("X").unwrap();
        assert_eq!(bars[0].timestamp, 1_705_276_800_000);
        assert_eq!(bars[0].close, 1.5);
    }

    #[test]
    fn fetch_bars_header_only_is_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_bars("CBA").unwrap().is_empty());
    }

    #[test]
    fn fetch_bars_missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_bars("XYZ");
        assert!(matches!(result, Err(QuantError::NoData { symbol }) if symbol == "XYZ"));
    }

    #[test]
    fn fetch_bars_bad_value_reports_line() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,1,2,0.5,abc,10\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_bars("BAD").unwrap_err();
        match err {
            QuantError::Data { reason } => {
                assert!(reason.contains("line 2"));
                assert!(reason.contains("close"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fetch_bars_bad_date() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,open,high,low,close,volume\n15/01/2024,1,2,0.5,1,10\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_bars("BAD"),
            Err(QuantError::Data { .. })
        ));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["BHP", "CBA"]);
    }

    #[test]
    fn list_symbols_missing_directory() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/quantkit/data"));
        assert!(adapter.list_symbols().is_err());
    }
}
