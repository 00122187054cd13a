//! Explicit trading configuration handed to every component at construction.

use crate::domain::aggregator::DEFAULT_TICKS_PER_BAR;
use crate::domain::sizing::{DEFAULT_RISK_PER_TRADE_PCT, DEFAULT_TICK_VALUE};

pub const DEFAULT_FEE_TICKS: f64 = 4.0;
pub const DEFAULT_SLIPPAGE_TICKS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TradingConfig {
    pub fee_ticks: f64,
    pub slippage_ticks: f64,
    pub ticks_per_kbar: usize,
    pub initial_capital: f64,
    pub risk_per_trade_pct: f64,
    pub tick_value: f64,
}

impl TradingConfig {
    pub fn with_capital(initial_capital: f64) -> Self {
        Self {
            fee_ticks: DEFAULT_FEE_TICKS,
            slippage_ticks: DEFAULT_SLIPPAGE_TICKS,
            ticks_per_kbar: DEFAULT_TICKS_PER_BAR,
            initial_capital,
            risk_per_trade_pct: DEFAULT_RISK_PER_TRADE_PCT,
            tick_value: DEFAULT_TICK_VALUE,
        }
    }
}
