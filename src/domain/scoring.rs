//! Weighted composite score for a single instrument.
//!
//! Four components are normalised to [0, 1]: excess return, low volatility,
//! liquidity and length of history. The composite is their weighted sum.
//! Weights are expected to sum to 1; any other sum is logged and used as is.

use super::indicator::{mean, population_stddev};
use super::metrics::TRADING_DAYS_PER_YEAR;
use super::ohlcv::{Bar, MILLIS_PER_DAY};

const DAYS_PER_YEAR: f64 = 365.25;
/// Average volume at which the liquidity factor saturates.
const FULL_LIQUIDITY_VOLUME: f64 = 1e6;
/// Age in years at which the track record factor saturates (log base).
const FULL_TRACK_RECORD_YEARS: f64 = 10.0;
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScottScoreWeights {
    pub returns: f64,
    pub risk: f64,
    pub liquidity: f64,
    pub proven: f64,
}

impl Default for ScottScoreWeights {
    fn default() -> Self {
        ScottScoreWeights {
            returns: 0.25,
            risk: 0.25,
            liquidity: 0.25,
            proven: 0.25,
        }
    }
}

impl ScottScoreWeights {
    pub fn sum(&self) -> f64 {
        self.returns + self.risk + self.liquidity + self.proven
    }

    pub fn is_balanced(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

/// Normalisation bounds for the return and risk scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParams {
    pub risk_free_rate: f64,
    /// Excess return that earns a full return score.
    pub max_excess: f64,
    /// Volatility at which the risk score reaches zero.
    pub max_vol: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        ScoreParams {
            risk_free_rate: 0.045,
            max_excess: 0.15,
            max_vol: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScottScoreComponents {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub liquidity_factor: f64,
    pub track_record_factor: f64,
    pub return_score: f64,
    pub risk_score: f64,
    pub composite_score: f64,
}

/// Score `candles`, which may be in any order. The slice is not modified.
pub fn calculate_scott_score(
    candles: &[Bar],
    weights: &ScottScoreWeights,
    params: &ScoreParams,
) -> ScottScoreComponents {
    let mut sorted = candles.to_vec();
    sorted.sort_by_key(|bar| bar.timestamp);

    let returns = daily_returns(&sorted);
    let annualized_return = mean(&returns) * TRADING_DAYS_PER_YEAR;
    let annualized_volatility = population_stddev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
    let liquidity_factor = liquidity_factor(&sorted);
    let track_record_factor = track_record_factor(&sorted);

    let return_score =
        clamp01((annualized_return - params.risk_free_rate) / params.max_excess);
    let risk_score = clamp01((params.max_vol - annualized_volatility) / params.max_vol);

    if !weights.is_balanced() {
        tracing::warn!(
            weight_sum = weights.sum(),
            "score weights do not sum to 1, scores may not be balanced"
        );
    }

    let composite_score = weights.returns * return_score
        + weights.risk * risk_score
        + weights.liquidity * liquidity_factor
        + weights.proven * track_record_factor;

    ScottScoreComponents {
        annualized_return,
        annualized_volatility,
        liquidity_factor,
        track_record_factor,
        return_score,
        risk_score,
        composite_score,
    }
}

/// Empty when fewer than two candles, which zeroes return and volatility.
fn daily_returns(sorted: &[Bar]) -> Vec<f64> {
    sorted
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

fn liquidity_factor(sorted: &[Bar]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let volumes: Vec<f64> = sorted.iter().map(|bar| bar.volume).collect();
    let avg_volume = mean(&volumes);
    ((avg_volume + 1.0).ln() / FULL_LIQUIDITY_VOLUME.ln()).min(1.0)
}

fn track_record_factor(sorted: &[Bar]) -> f64 {
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    let age_days = (last.timestamp - first.timestamp) as f64 / MILLIS_PER_DAY;
    let age_years = age_days / DAYS_PER_YEAR;
    ((age_years + 1.0).ln() / FULL_TRACK_RECORD_YEARS.ln()).min(1.0)
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
