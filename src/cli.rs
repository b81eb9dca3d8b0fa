//! CLI definition and dispatch.
//!
//! Every command loads and validates the INI config, opens the CSV price
//! directory from `[data] path`, then runs one engine operation. Results go to
//! stdout; progress and errors go to stderr.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{parse_symbols, validate_config};
use crate::domain::error::QuantError;
use crate::domain::indicator::DEFAULT_RSI_PERIOD;
use crate::domain::metrics::{sharpe_ratio, SharpeOptions};
use crate::domain::monte_carlo::{monte_carlo_simulation, MonteCarloResult};
use crate::domain::ohlcv::Bar;
use crate::domain::scoring::{
    calculate_scott_score, ScoreParams, ScottScoreComponents, ScottScoreWeights,
};
use crate::domain::signal::rotation::{DEFAULT_BOTTOM_COUNT, DEFAULT_TOP_COUNT};
use crate::domain::signal::rsi_volume::{DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD};
use crate::domain::signal::{
    momentum_return, resample_to_weekly_closes, rotation_signal, DonchianBreakout,
    DualMaCrossover, MacdCross, MomentumEntry, RotationSignal, RsiVolumeFilter, SignalResult,
};
use crate::domain::strategy::{Strategy, StrategyKind};
use crate::domain::walk_forward::{walk_forward_backtest, WalkForwardConfig, WalkForwardResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_SIMULATIONS: usize = 1000;
pub const DEFAULT_LOOKBACK_BARS: usize = 21;

#[derive(Parser, Debug)]
#[command(
    name = "quantkit",
    about = "Signals, backtests and scores for daily price series"
)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest the configured strategy on one symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Anchored walk-forward analysis on one symbol
    WalkForward {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Shuffle the backtest equity curve and report the outcome spread
    MonteCarlo {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        simulations: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Current signal from every generator for one symbol
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Composite score for one symbol
    Score {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Momentum rotation across the configured basket
    Rotate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    Symbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest { config, symbol } => with_data(&config, |cfg, data| {
            let symbol = resolve_symbol(symbol.as_deref(), cfg)?;
            let result = backtest_symbol(data, cfg, &symbol)?;
            print_backtest(&symbol, &result);
            Ok(())
        }),
        Command::WalkForward { config, symbol } => with_data(&config, |cfg, data| {
            let symbol = resolve_symbol(symbol.as_deref(), cfg)?;
            let folds = walk_forward_symbol(data, cfg, &symbol)?;
            print_walk_forward(&symbol, &folds);
            Ok(())
        }),
        Command::MonteCarlo {
            config,
            symbol,
            simulations,
            seed,
        } => with_data(&config, |cfg, data| {
            let symbol = resolve_symbol(symbol.as_deref(), cfg)?;
            let result = monte_carlo_symbol(data, cfg, &symbol, simulations, seed)?;
            print_monte_carlo(&symbol, &result);
            Ok(())
        }),
        Command::Signals { config, symbol } => with_data(&config, |cfg, data| {
            let symbol = resolve_symbol(symbol.as_deref(), cfg)?;
            let signals = signals_for_symbol(data, cfg, &symbol)?;
            println!("{symbol}");
            for (name, result) in &signals {
                print_signal(name, result);
            }
            Ok(())
        }),
        Command::Score { config, symbol } => with_data(&config, |cfg, data| {
            let symbol = resolve_symbol(symbol.as_deref(), cfg)?;
            let (score, sharpe) = score_symbol(data, cfg, &symbol)?;
            print_score(&symbol, &score, sharpe);
            Ok(())
        }),
        Command::Rotate { config } => with_data(&config, |cfg, data| {
            for entry in rotate_basket(data, cfg)? {
                print_signal(&entry.symbol, &entry.signal);
            }
            Ok(())
        }),
        Command::Symbols { config } => with_data(&config, |_, data| {
            let symbols = data.list_symbols()?;
            for symbol in &symbols {
                println!("{symbol}");
            }
            tracing::info!(count = symbols.len(), "symbols found");
            Ok(())
        }),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Load and validate the config, open the data directory, then run `command`.
fn with_data<F>(config_path: &Path, command: F) -> ExitCode
where
    F: FnOnce(&FileConfigAdapter, &CsvAdapter) -> Result<(), QuantError>,
{
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let data = match build_data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match command(&adapter, &data) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match build_strategy(&adapter) {
        Ok(strategy) => eprintln!("  strategy: {}", strategy.kind()),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    if let Some(symbol) = adapter.get_string("backtest", "symbol") {
        eprintln!("  symbol:   {}", symbol.trim().to_uppercase());
    }
    if let Some(symbols) = adapter.get_string("rotation", "symbols") {
        eprintln!("  basket:   {}", parse_symbols(&symbols).join(", "));
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn build_data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, QuantError> {
    let path = config
        .get_string("data", "path")
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| QuantError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path.trim())))
}

pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, QuantError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| QuantError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        initial_cash: config.get_double("backtest", "initial_cash", defaults.initial_cash),
        weekly: config.get_bool("backtest", "weekly", defaults.weekly),
    }
}

pub fn build_walk_forward_config(config: &dyn ConfigPort) -> WalkForwardConfig {
    let backtest = build_backtest_config(config);
    let defaults = WalkForwardConfig::default();
    WalkForwardConfig {
        in_sample_years: config.get_double(
            "walk_forward",
            "in_sample_years",
            defaults.in_sample_years,
        ),
        out_sample_years: config.get_double(
            "walk_forward",
            "out_sample_years",
            defaults.out_sample_years,
        ),
        initial_cash: backtest.initial_cash,
        weekly: backtest.weekly,
    }
}

pub fn build_strategy(config: &dyn ConfigPort) -> Result<Strategy, QuantError> {
    let kind = match config.get_string("backtest", "strategy") {
        Some(name) => name.parse::<StrategyKind>()?,
        None => StrategyKind::DualMa,
    };

    let strategy = match kind {
        StrategyKind::DualMa => Strategy::DualMa(build_dual_ma(config)?),
        StrategyKind::Macd => Strategy::Macd(MacdCross),
        StrategyKind::Donchian => Strategy::Donchian(build_donchian(config)?),
    };
    Ok(strategy)
}

fn build_dual_ma(config: &dyn ConfigPort) -> Result<DualMaCrossover, QuantError> {
    let defaults = DualMaCrossover::default();
    DualMaCrossover::new(
        period(config, "short_period", defaults.short_period()),
        period(config, "long_period", defaults.long_period()),
    )
}

fn build_donchian(config: &dyn ConfigPort) -> Result<DonchianBreakout, QuantError> {
    let default = DonchianBreakout::default().period();
    DonchianBreakout::new(period(config, "donchian_period", default))
}

pub fn build_rsi_volume(config: &dyn ConfigPort) -> Result<RsiVolumeFilter, QuantError> {
    RsiVolumeFilter::new(
        period(config, "rsi_period", DEFAULT_RSI_PERIOD),
        config.get_double("strategy", "overbought", DEFAULT_OVERBOUGHT),
        config.get_double("strategy", "oversold", DEFAULT_OVERSOLD),
    )
}

pub fn build_score_weights(config: &dyn ConfigPort) -> ScottScoreWeights {
    let defaults = ScottScoreWeights::default();
    ScottScoreWeights {
        returns: config.get_double("score", "returns", defaults.returns),
        risk: config.get_double("score", "risk", defaults.risk),
        liquidity: config.get_double("score", "liquidity", defaults.liquidity),
        proven: config.get_double("score", "proven", defaults.proven),
    }
}

pub fn build_score_params(config: &dyn ConfigPort) -> ScoreParams {
    let defaults = ScoreParams::default();
    ScoreParams {
        risk_free_rate: config.get_double("score", "risk_free_rate", defaults.risk_free_rate),
        max_excess: config.get_double("score", "max_excess", defaults.max_excess),
        max_vol: config.get_double("score", "max_vol", defaults.max_vol),
    }
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    count(config, "strategy", key, default)
}

/// Negative values collapse to 0, which the consuming constructor rejects.
fn count(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    let value = config.get_int(section, key, default as i64);
    usize::try_from(value).unwrap_or(0)
}

fn fetch_non_empty(data: &dyn DataPort, symbol: &str) -> Result<Vec<Bar>, QuantError> {
    let bars = data.fetch_bars(symbol)?;
    if bars.is_empty() {
        return Err(QuantError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(bars)
}

pub fn backtest_symbol(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
) -> Result<BacktestResult, QuantError> {
    let bars = fetch_non_empty(data, symbol)?;
    let strategy = build_strategy(config)?;
    let bt_config = build_backtest_config(config);
    tracing::info!(symbol, strategy = %strategy.kind(), bars = bars.len(), "running backtest");
    run_backtest(&bars, &strategy, &bt_config)
}

pub fn walk_forward_symbol(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
) -> Result<Vec<WalkForwardResult>, QuantError> {
    let bars = fetch_non_empty(data, symbol)?;
    let strategy = build_strategy(config)?;
    let wf_config = build_walk_forward_config(config);
    tracing::info!(symbol, strategy = %strategy.kind(), bars = bars.len(), "running walk-forward");
    let folds = walk_forward_backtest(&bars, &strategy, &wf_config)?;
    if folds.is_empty() {
        tracing::warn!(
            symbol,
            bars = bars.len(),
            "series too short for one in-sample plus out-sample window"
        );
    }
    Ok(folds)
}

/// Backtest `symbol`, then resample its equity curve.
///
/// `simulations` and `seed` override `[monte_carlo]`. Without any seed the
/// generator is seeded from the OS.
pub fn monte_carlo_symbol(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
    simulations: Option<usize>,
    seed: Option<u64>,
) -> Result<MonteCarloResult, QuantError> {
    let backtest = backtest_symbol(data, config, symbol)?;
    let simulations = simulations.unwrap_or_else(|| {
        count(config, "monte_carlo", "simulations", DEFAULT_SIMULATIONS)
    });
    let seed = seed.or_else(|| {
        config
            .get_string("monte_carlo", "seed")
            .and_then(|s| s.trim().parse::<u64>().ok())
    });

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(symbol, simulations, seed, "running monte carlo");
    monte_carlo_simulation(&backtest.equity_curve, simulations, &mut rng)
}

/// Latest signal from each generator.
///
/// The closes-driven generators see weekly-resampled closes; the RSI/volume
/// filter sees the daily bars.
pub fn signals_for_symbol(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
) -> Result<Vec<(String, SignalResult)>, QuantError> {
    let bars = fetch_non_empty(data, symbol)?;
    let weekly = resample_to_weekly_closes(&bars)?;

    let dual_ma = build_dual_ma(config)?;
    let donchian = build_donchian(config)?;
    let rsi_volume = build_rsi_volume(config)?;

    Ok(vec![
        ("dual_ma".to_string(), dual_ma.evaluate(&weekly)),
        ("macd".to_string(), MacdCross.evaluate(&weekly)),
        ("donchian".to_string(), donchian.evaluate(&weekly)),
        ("rsi_volume".to_string(), rsi_volume.evaluate(&bars)),
    ])
}

/// Composite score plus the close-to-close Sharpe ratio for context.
pub fn score_symbol(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
    symbol: &str,
) -> Result<(ScottScoreComponents, Option<f64>), QuantError> {
    let bars = fetch_non_empty(data, symbol)?;
    let weights = build_score_weights(config);
    let params = build_score_params(config);
    let score = calculate_scott_score(&bars, &weights, &params);
    let sharpe = sharpe_ratio(
        &bars,
        SharpeOptions {
            risk_free_rate: params.risk_free_rate,
            ..SharpeOptions::default()
        },
    );
    Ok((score, sharpe))
}

/// Rank `[rotation] symbols` by trailing return. Symbols with no data or not
/// enough history are skipped with a warning.
pub fn rotate_basket(
    data: &dyn DataPort,
    config: &dyn ConfigPort,
) -> Result<Vec<RotationSignal>, QuantError> {
    let symbols = config
        .get_string("rotation", "symbols")
        .map(|s| parse_symbols(&s))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| QuantError::ConfigMissing {
            section: "rotation".into(),
            key: "symbols".into(),
        })?;
    let lookback = count(config, "rotation", "lookback_bars", DEFAULT_LOOKBACK_BARS);
    let top = count(config, "rotation", "top_count", DEFAULT_TOP_COUNT);
    let bottom = count(config, "rotation", "bottom_count", DEFAULT_BOTTOM_COUNT);

    let mut entries = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let bars = match data.fetch_bars(symbol) {
            Ok(bars) => bars,
            Err(QuantError::NoData { .. }) => {
                tracing::warn!(symbol = %symbol, "skipping, no data");
                continue;
            }
            Err(e) => return Err(e),
        };
        match momentum_return(&bars, lookback) {
            Some(returns_m) => entries.push(MomentumEntry::new(symbol.clone(), returns_m)),
            None => tracing::warn!(
                symbol = %symbol,
                bars = bars.len(),
                lookback,
                "skipping, not enough history"
            ),
        }
    }

    if entries.is_empty() {
        return Err(QuantError::Data {
            reason: format!("no symbol has more than {lookback} bars"),
        });
    }
    Ok(rotation_signal(&entries, top, bottom))
}

fn print_backtest(symbol: &str, result: &BacktestResult) {
    println!("=== Backtest: {symbol} ===");
    println!("Initial Cash:     {:.2}", result.initial_cash);
    println!("Final Value:      {:.2}", result.final_value);
    println!("CAGR:             {:.2}%", result.cagr * 100.0);
    println!("Max Drawdown:     {:.1}%", result.max_drawdown * 100.0);
    println!("Sharpe Ratio:     {:.2}", result.sharpe);
    println!("Total Trades:     {}", result.trades.len());
    println!("Win Rate:         {:.1}%", result.win_rate * 100.0);
    println!("Profit Factor:    {:.2}", result.profit_factor);
}

fn print_walk_forward(symbol: &str, folds: &[WalkForwardResult]) {
    println!("=== Walk-forward: {symbol} ===");
    if folds.is_empty() {
        println!("No complete folds.");
        return;
    }
    println!("{:>4}  {:>10}  {:>10}  {:>10}", "fold", "in CAGR", "out CAGR", "robustness");
    for (i, fold) in folds.iter().enumerate() {
        println!(
            "{:>4}  {:>9.2}%  {:>9.2}%  {:>10.2}",
            i + 1,
            fold.in_sample.cagr * 100.0,
            fold.out_sample.cagr * 100.0,
            fold.robustness
        );
    }
}

fn print_monte_carlo(symbol: &str, result: &MonteCarloResult) {
    println!("=== Monte Carlo: {symbol} ===");
    println!("CAGR 5th:         {:.2}%", result.cagr_5th * 100.0);
    println!("CAGR median:      {:.2}%", result.median_cagr * 100.0);
    println!("CAGR 95th:        {:.2}%", result.cagr_95th * 100.0);
    println!("P(profit):        {:.1}%", result.prob_profit * 100.0);
    println!("Max DD @ 95th:    {:.1}%", result.max_drawdown_95th * 100.0);
}

fn print_signal(name: &str, result: &SignalResult) {
    println!(
        "  {:<12} {:<5} {:.2}  {}",
        name, result.signal, result.confidence, result.reason
    );
}

fn print_score(symbol: &str, score: &ScottScoreComponents, sharpe: Option<f64>) {
    println!("=== Score: {symbol} ===");
    println!("Annual Return:    {:.2}%", score.annualized_return * 100.0);
    println!("Annual Vol:       {:.2}%", score.annualized_volatility * 100.0);
    match sharpe {
        Some(s) => println!("Sharpe Ratio:     {s:.2}"),
        None => println!("Sharpe Ratio:     n/a"),
    }
    println!("Return Score:     {:.3}", score.return_score);
    println!("Risk Score:       {:.3}", score.risk_score);
    println!("Liquidity:        {:.3}", score.liquidity_factor);
    println!("Track Record:     {:.3}", score.track_record_factor);
    println!("Composite:        {:.3}", score.composite_score);
}
