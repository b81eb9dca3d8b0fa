//! Core domain types and logic: indicators, signal generators, the backtest
//! engine and the scoring model.

pub mod ohlcv;
pub mod error;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod metrics;
pub mod backtest;
pub mod walk_forward;
pub mod monte_carlo;
pub mod scoring;
pub mod strategy;
pub mod config_validation;
