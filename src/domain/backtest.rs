//! Signal replay over recorded bars.
//!
//! Each non-skipped signal becomes one [`Trade`] setup in emission order.
//! Trades are not filled or exited: whether price later reaches the stop or
//! the target is never evaluated, and capital stays at its initial value for
//! the whole run.

use crate::domain::bar::Bar;
use crate::domain::config::TradingConfig;
use crate::domain::signal::SignalEngine;
use crate::domain::sizing::PositionSizer;
use crate::domain::trade::Trade;

#[derive(Debug, Clone)]
pub struct BacktestRunner {
    engine: SignalEngine,
    sizer: PositionSizer,
    slippage: f64,
}

impl BacktestRunner {
    pub fn new(config: &TradingConfig) -> Self {
        Self {
            engine: SignalEngine::new(config.fee_ticks, config.slippage_ticks),
            sizer: PositionSizer::new(
                config.initial_capital,
                config.risk_per_trade_pct,
                config.tick_value,
            ),
            slippage: config.slippage_ticks,
        }
    }

    /// Feed every bar, in order, through one continuous signal history.
    pub fn run(mut self, bars: &[Bar]) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut skipped = 0usize;

        for bar in bars {
            let Some(signal) = self.engine.on_bar(bar.clone()) else {
                continue;
            };
            let size = self.sizer.size(signal.stop_distance);
            if size == 0 {
                skipped += 1;
                continue;
            }
            trades.push(Trade::from_signal(&signal, self.slippage, size));
        }

        if skipped > 0 {
            log::warn!("{} signals skipped: risk budget below one contract", skipped);
        }
        log::info!("backtest: {} bars, {} trades", bars.len(), trades.len());
        trades
    }
}

pub fn run_backtest(bars: &[Bar], config: &TradingConfig) -> Vec<Trade> {
    BacktestRunner::new(config).run(bars)
}
