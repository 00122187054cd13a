#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use kbartrader::domain::bar::Bar;
use kbartrader::domain::config::TradingConfig;
use kbartrader::domain::error::TraderError;
use kbartrader::domain::tick::{RawTick, Tick};
use kbartrader::domain::trade::Trade;
use kbartrader::ports::data_port::DataPort;
use kbartrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub ticks: HashMap<String, Vec<RawTick>>,
    pub bars: HashMap<String, Vec<Bar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            ticks: HashMap::new(),
            bars: HashMap::new(),
        }
    }

    pub fn with_ticks(mut self, source: &str, ticks: Vec<RawTick>) -> Self {
        self.ticks.insert(source.to_string(), ticks);
        self
    }

    pub fn with_bars(mut self, source: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(source.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ticks(&self, source: &str) -> Result<Vec<RawTick>, TraderError> {
        self.ticks
            .get(source)
            .cloned()
            .ok_or_else(|| TraderError::Data {
                reason: format!("no tick source {}", source),
            })
    }

    fn fetch_bars(&self, source: &str) -> Result<Vec<Bar>, TraderError> {
        self.bars
            .get(source)
            .cloned()
            .ok_or_else(|| TraderError::Data {
                reason: format!("no bar source {}", source),
            })
    }
}

#[derive(Default)]
pub struct MockReportPort {
    pub trades: RefCell<HashMap<String, Vec<Trade>>>,
    pub bars: RefCell<HashMap<String, Vec<Bar>>>,
}

impl ReportPort for MockReportPort {
    fn write_trades(&self, trades: &[Trade], output_path: &str) -> Result<(), TraderError> {
        self.trades
            .borrow_mut()
            .insert(output_path.to_string(), trades.to_vec());
        Ok(())
    }

    fn write_bars(&self, bars: &[Bar], output_path: &str) -> Result<(), TraderError> {
        self.bars
            .borrow_mut()
            .insert(output_path.to_string(), bars.to_vec());
        Ok(())
    }
}

pub fn ts(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 26)
        .unwrap()
        .and_hms_opt(8, 45, 0)
        .unwrap()
        + chrono::Duration::seconds(i as i64)
}

pub fn tick(i: usize, price: f64, volume: u64) -> Tick {
    Tick {
        time: ts(i),
        price,
        volume,
    }
}

/// Bars whose range is close ± 4 (TR = 8 while closes move by < 4).
pub fn bars_with_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            time: ts(i),
            open: close,
            high: close + 4.0,
            low: close - 4.0,
            close,
            volume: 3,
        })
        .collect()
}

/// Three raw ticks per close producing the bars of [`bars_with_closes`].
pub fn raw_ticks_for_closes(closes: &[f64]) -> Vec<RawTick> {
    let mut ticks = Vec::new();
    for &c in closes {
        for price in [c + 4.0, c - 4.0, c] {
            ticks.push(RawTick::new(ts(ticks.len()), price, 1));
        }
    }
    ticks
}

/// Twelve flat closes followed by three strictly rising ones.
pub fn rising_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 12];
    closes.extend([100.5, 101.0, 102.0]);
    closes
}

pub fn sample_config() -> TradingConfig {
    TradingConfig {
        fee_ticks: 4.0,
        slippage_ticks: 0.5,
        ticks_per_kbar: 3,
        initial_capital: 100_000.0,
        risk_per_trade_pct: 0.5,
        tick_value: 10.0,
    }
}
