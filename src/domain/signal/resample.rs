//! Daily-to-weekly close resampling.
//!
//! Buckets bars by `year * 52 + day_of_month / 7` on the UTC calendar date.
//! This approximates a week number and is not ISO-week correct: the key resets
//! every month, so adjacent bars from different months can share a bucket.
//! The weekly generators are tuned against exactly this bucketing.

use chrono::Datelike;

use crate::domain::error::QuantError;
use crate::domain::ohlcv::Bar;

/// Last close of each run of bars sharing a week key. Input must be ascending.
pub fn resample_to_weekly_closes(bars: &[Bar]) -> Result<Vec<f64>, QuantError> {
    let mut weekly = Vec::new();
    let mut current: Option<(i64, f64)> = None;

    for bar in bars {
        let key = week_key(bar)?;
        match current {
            Some((week, close)) if week != key => {
                weekly.push(close);
                current = Some((key, bar.close));
            }
            _ => current = Some((key, bar.close)),
        }
    }

    if let Some((_, close)) = current {
        weekly.push(close);
    }
    Ok(weekly)
}

fn week_key(bar: &Bar) -> Result<i64, QuantError> {
    let date = bar.datetime()?;
    Ok(date.year() as i64 * 52 + (date.day() / 7) as i64)
}
