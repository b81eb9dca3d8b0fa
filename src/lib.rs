//! quantkit: technical indicators, rule-based trading signals, a single-asset
//! backtester with walk-forward and Monte Carlo analysis, and a weighted
//! instrument scoring model.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command wiring in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
