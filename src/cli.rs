//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_recorder::CsvRecorder;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregator::{ticks_to_bars, DEFAULT_TICKS_PER_BAR};
use crate::domain::backtest::BacktestRunner;
use crate::domain::config::{TradingConfig, DEFAULT_FEE_TICKS, DEFAULT_SLIPPAGE_TICKS};
use crate::domain::config_validation::{validate_config, validate_strategy_config};
use crate::domain::error::TraderError;
use crate::domain::session::TradingSession;
use crate::domain::signal::Side;
use crate::domain::sizing::{DEFAULT_RISK_PER_TRADE_PCT, DEFAULT_TICK_VALUE};
use crate::domain::tick::normalize_tick;
use crate::domain::trade::Trade;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_TRADES_OUTPUT: &str = "backtest_trades.csv";

#[derive(Parser, Debug)]
#[command(name = "kbartrader", about = "Tick-count kbar momentum trader and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a raw tick CSV into fixed-count bars
    Convert {
        #[arg(short, long)]
        ticks: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        ticks_per_bar: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay the signal chain over recorded bars and write the trade log
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        bars: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Drive a live session over ticks in file order
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticks: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Convert {
            ticks,
            output,
            ticks_per_bar,
            config,
        } => run_convert(&ticks, &output, ticks_per_bar, config.as_ref()),
        Command::Backtest {
            config,
            bars,
            output,
        } => run_backtest(&config, &bars, output.as_ref()),
        Command::Replay { config, ticks } => run_replay(&config, &ticks),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(report)
}

fn report(err: TraderError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn build_trading_config(adapter: &dyn ConfigPort) -> Result<TradingConfig, TraderError> {
    validate_config(adapter)?;
    Ok(TradingConfig {
        fee_ticks: adapter.get_double("strategy", "fee_ticks", DEFAULT_FEE_TICKS),
        slippage_ticks: adapter.get_double("strategy", "slippage_ticks", DEFAULT_SLIPPAGE_TICKS),
        ticks_per_kbar: adapter.get_int("strategy", "ticks_per_kbar", DEFAULT_TICKS_PER_BAR as i64)
            as usize,
        initial_capital: adapter.get_double("backtest", "initial_capital", 0.0),
        risk_per_trade_pct: adapter.get_double(
            "backtest",
            "risk_per_trade_pct",
            DEFAULT_RISK_PER_TRADE_PCT,
        ),
        tick_value: adapter.get_double("backtest", "tick_value", DEFAULT_TICK_VALUE),
    })
}

/// Recorder built from `[recorder]`; `None` when disabled or no path is set.
pub fn build_recorder(adapter: &dyn ConfigPort) -> Option<CsvRecorder> {
    if !adapter.get_bool("recorder", "enabled", true) {
        return None;
    }
    let tick_path = adapter.get_path("recorder", "tick_path");
    let trade_path = adapter.get_path("recorder", "trade_path");
    if tick_path.is_none() && trade_path.is_none() {
        return None;
    }
    Some(CsvRecorder::new(tick_path.as_deref(), trade_path.as_deref()))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn run_convert(
    ticks_path: &PathBuf,
    output_path: &PathBuf,
    ticks_per_bar: Option<usize>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let ticks_per_bar = match (ticks_per_bar, config_path) {
        (Some(n), _) => n,
        (None, Some(path)) => {
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            if let Err(e) = validate_strategy_config(&adapter) {
                return report(e);
            }
            adapter.get_int("strategy", "ticks_per_kbar", DEFAULT_TICKS_PER_BAR as i64) as usize
        }
        (None, None) => DEFAULT_TICKS_PER_BAR,
    };

    let adapter = CsvAdapter::new(PathBuf::from("."));
    match convert_ticks(
        &adapter,
        &adapter,
        &path_str(ticks_path),
        &path_str(output_path),
        ticks_per_bar,
    ) {
        Ok(count) => {
            eprintln!(
                "Wrote {} {}-tick bars to {}",
                count,
                ticks_per_bar,
                output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

/// Normalize, sort and aggregate a tick file into a bar file. Returns the bar count.
///
/// Malformed ticks are skipped with a warning.
pub fn convert_ticks(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    ticks_source: &str,
    output_path: &str,
    ticks_per_bar: usize,
) -> Result<usize, TraderError> {
    let raw = data_port.fetch_ticks(ticks_source)?;
    eprintln!("Loaded {} ticks from {}", raw.len(), ticks_source);

    let mut ticks = Vec::with_capacity(raw.len());
    for (row, r) in raw.iter().enumerate() {
        match normalize_tick(r) {
            Ok(t) => ticks.push(t),
            Err(e) => log::warn!("skipping tick row {}: {}", row + 1, e),
        }
    }

    let bars = ticks_to_bars(ticks, ticks_per_bar)?;
    report_port.write_bars(&bars, output_path)?;
    Ok(bars.len())
}

fn run_backtest(config_path: &PathBuf, bars_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_trading_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRADES_OUTPUT));
    let csv = CsvAdapter::new(PathBuf::from("."));

    match run_backtest_pipeline(&csv, &csv, &config, &path_str(bars_path), &path_str(&output)) {
        Ok(trades) => {
            print_summary(&trades);
            eprintln!("\nTrades written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    config: &TradingConfig,
    bars_source: &str,
    output_path: &str,
) -> Result<Vec<Trade>, TraderError> {
    let bars = data_port.fetch_bars(bars_source)?;
    eprintln!("Running backtest over {} bars", bars.len());

    let trades = BacktestRunner::new(config).run(&bars);
    report_port.write_trades(&trades, output_path)?;
    Ok(trades)
}

fn print_summary(trades: &[Trade]) {
    let buys = trades.iter().filter(|t| t.side == Side::Buy).count();
    let contracts: u64 = trades.iter().map(|t| t.size).sum();
    eprintln!("\n=== Backtest Summary ===");
    eprintln!("Trades:           {}", trades.len());
    eprintln!("Buy / Sell:       {} / {}", buys, trades.len() - buys);
    eprintln!("Contracts:        {}", contracts);
}

fn run_replay(config_path: &PathBuf, ticks_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_trading_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    let mut session = match TradingSession::new(&config) {
        Ok(s) => s,
        Err(e) => return report(e),
    };
    if let Some(recorder) = build_recorder(&adapter) {
        session = session.with_recorder(Box::new(recorder));
    }

    let csv = CsvAdapter::new(PathBuf::from("."));
    match run_replay_pipeline(&csv, &mut session, &path_str(ticks_path)) {
        Ok(trades) => {
            for t in &trades {
                println!(
                    "{},{},{},{},{}",
                    t.side, t.entry_price, t.stop_price, t.target_price, t.size
                );
            }
            eprintln!(
                "Replayed {} bars, {} trade setups",
                session.bars_seen(),
                trades.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

/// Feed ticks to a session in source order. Malformed ticks are rejected
/// individually and do not stop the replay.
pub fn run_replay_pipeline(
    data_port: &dyn DataPort,
    session: &mut TradingSession,
    ticks_source: &str,
) -> Result<Vec<Trade>, TraderError> {
    let raw = data_port.fetch_ticks(ticks_source)?;
    let mut trades = Vec::new();
    for (row, r) in raw.iter().enumerate() {
        match session.on_raw_tick(r) {
            Ok(Some(trade)) => trades.push(trade),
            Ok(None) => {}
            Err(e) => log::warn!("rejected tick row {}: {}", row + 1, e),
        }
    }
    Ok(trades)
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_trading_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    eprintln!("\nStrategy:");
    eprintln!("  fee_ticks:          {}", config.fee_ticks);
    eprintln!("  slippage_ticks:     {}", config.slippage_ticks);
    eprintln!("  ticks_per_kbar:     {}", config.ticks_per_kbar);
    eprintln!("\nRisk:");
    eprintln!("  initial_capital:    {}", config.initial_capital);
    eprintln!("  risk_per_trade_pct: {}", config.risk_per_trade_pct);
    eprintln!("  tick_value:         {}", config.tick_value);
    if build_recorder(&adapter).is_some() {
        eprintln!("\nRecorder: enabled");
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
