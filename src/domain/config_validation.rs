//! Configuration validation.
//!
//! Checks every value that is present before a command runs. Absent keys fall
//! back to their defaults and are not errors, except `[data] path`.

use crate::domain::error::QuantError;
use crate::domain::signal::dual_ma::{DEFAULT_LONG_PERIOD, DEFAULT_SHORT_PERIOD};
use crate::domain::signal::rsi_volume::{DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD};
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    validate_data(config)?;
    validate_backtest(config)?;
    validate_strategy(config)?;
    validate_walk_forward(config)?;
    validate_monte_carlo(config)?;
    validate_score(config)?;
    validate_rotation(config)?;
    Ok(())
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), QuantError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(QuantError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_backtest(config: &dyn ConfigPort) -> Result<(), QuantError> {
    if let Some(cash) = optional_double(config, "backtest", "initial_cash")? {
        if !cash.is_finite() || cash <= 0.0 {
            return Err(invalid("backtest", "initial_cash", "initial_cash must be positive"));
        }
    }

    if let Some(name) = config.get_string("backtest", "strategy") {
        name.parse::<StrategyKind>().map_err(|_| {
            invalid(
                "backtest",
                "strategy",
                &format!("unknown strategy '{name}', expected dual_ma, macd or donchian"),
            )
        })?;
    }

    if let Some(weekly) = config.get_string("backtest", "weekly") {
        if !matches!(
            weekly.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "false" | "no" | "0"
        ) {
            return Err(invalid("backtest", "weekly", "weekly must be true or false"));
        }
    }
    Ok(())
}

fn validate_strategy(config: &dyn ConfigPort) -> Result<(), QuantError> {
    let short = optional_int(config, "strategy", "short_period")?;
    let long = optional_int(config, "strategy", "long_period")?;
    let donchian = optional_int(config, "strategy", "donchian_period")?;
    let rsi_period = optional_int(config, "strategy", "rsi_period")?;

    for (key, value) in [
        ("short_period", short),
        ("long_period", long),
        ("donchian_period", donchian),
        ("rsi_period", rsi_period),
    ] {
        if let Some(v) = value {
            if v < 1 {
                return Err(invalid("strategy", key, &format!("{key} must be at least 1")));
            }
        }
    }

    let overbought = optional_double(config, "strategy", "overbought")?;
    let oversold = optional_double(config, "strategy", "oversold")?;
    for (key, value) in [("overbought", overbought), ("oversold", oversold)] {
        if let Some(v) = value {
            if !(0.0..=100.0).contains(&v) {
                return Err(invalid("strategy", key, &format!("{key} must lie within 0..=100")));
            }
        }
    }
    if overbought.is_some() || oversold.is_some() {
        let overbought = overbought.unwrap_or(DEFAULT_OVERBOUGHT);
        let oversold = oversold.unwrap_or(DEFAULT_OVERSOLD);
        if oversold >= overbought {
            return Err(invalid(
                "strategy",
                "oversold",
                &format!("oversold ({oversold}) must be below overbought ({overbought})"),
            ));
        }
    }

    // A lone period is checked against the other's default.
    if short.is_some() || long.is_some() {
        let short = short.unwrap_or(DEFAULT_SHORT_PERIOD as i64);
        let long = long.unwrap_or(DEFAULT_LONG_PERIOD as i64);
        if short >= long {
            return Err(invalid(
                "strategy",
                "short_period",
                &format!("short_period ({short}) must be less than long_period ({long})"),
            ));
        }
    }
    Ok(())
}

fn validate_walk_forward(config: &dyn ConfigPort) -> Result<(), QuantError> {
    for key in ["in_sample_years", "out_sample_years"] {
        if let Some(years) = optional_double(config, "walk_forward", key)? {
            if !years.is_finite() || years <= 0.0 {
                return Err(invalid("walk_forward", key, &format!("{key} must be positive")));
            }
        }
    }
    Ok(())
}

fn validate_monte_carlo(config: &dyn ConfigPort) -> Result<(), QuantError> {
    if let Some(sims) = optional_int(config, "monte_carlo", "simulations")? {
        if sims < 1 {
            return Err(invalid(
                "monte_carlo",
                "simulations",
                "simulations must be at least 1",
            ));
        }
    }
    if let Some(seed) = optional_int(config, "monte_carlo", "seed")? {
        if seed < 0 {
            return Err(invalid("monte_carlo", "seed", "seed must be non-negative"));
        }
    }
    Ok(())
}

fn validate_score(config: &dyn ConfigPort) -> Result<(), QuantError> {
    for key in ["returns", "risk", "liquidity", "proven"] {
        if let Some(weight) = optional_double(config, "score", key)? {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid("score", key, &format!("{key} weight must be non-negative")));
            }
        }
    }

    if let Some(rate) = optional_double(config, "score", "risk_free_rate")? {
        if !(0.0..1.0).contains(&rate) {
            return Err(invalid(
                "score",
                "risk_free_rate",
                "risk_free_rate must be between 0 and 1",
            ));
        }
    }

    for key in ["max_excess", "max_vol"] {
        if let Some(bound) = optional_double(config, "score", key)? {
            if !bound.is_finite() || bound <= 0.0 {
                return Err(invalid("score", key, &format!("{key} must be positive")));
            }
        }
    }
    Ok(())
}

fn validate_rotation(config: &dyn ConfigPort) -> Result<(), QuantError> {
    if let Some(symbols) = config.get_string("rotation", "symbols") {
        if parse_symbols(&symbols).is_empty() {
            return Err(invalid(
                "rotation",
                "symbols",
                "symbols must list at least one symbol",
            ));
        }
    }

    if let Some(lookback) = optional_int(config, "rotation", "lookback_bars")? {
        if lookback < 1 {
            return Err(invalid(
                "rotation",
                "lookback_bars",
                "lookback_bars must be at least 1",
            ));
        }
    }

    for key in ["top_count", "bottom_count"] {
        if let Some(count) = optional_int(config, "rotation", key)? {
            if count < 0 {
                return Err(invalid("rotation", key, &format!("{key} must be non-negative")));
            }
        }
    }
    Ok(())
}

/// Split a comma-separated symbol list, dropping blanks.
pub fn parse_symbols(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase())
        .collect()
}

fn optional_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, QuantError> {
    config
        .get_string(section, key)
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| invalid(section, key, &format!("{key} must be a number")))
        })
        .transpose()
}

fn optional_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, QuantError> {
    config
        .get_string(section, key)
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| invalid(section, key, &format!("{key} must be an integer")))
        })
        .transpose()
}

fn invalid(section: &str, key: &str, reason: &str) -> QuantError {
    QuantError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
