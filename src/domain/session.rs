//! Live tick path: one aggregator, one signal engine and one sizer per session.
//!
//! A session is single-owner state. Recording is a side channel: its errors
//! are logged and dropped at this boundary and never reach the caller.

use crate::domain::aggregator::BarAggregator;
use crate::domain::config::TradingConfig;
use crate::domain::error::TraderError;
use crate::domain::signal::SignalEngine;
use crate::domain::sizing::PositionSizer;
use crate::domain::tick::{normalize_tick, RawTick, Tick};
use crate::domain::trade::Trade;
use crate::ports::recorder_port::Recorder;

pub struct TradingSession {
    aggregator: BarAggregator,
    engine: SignalEngine,
    sizer: PositionSizer,
    slippage: f64,
    recorder: Option<Box<dyn Recorder>>,
    last_tick: Option<Tick>,
}

impl TradingSession {
    pub fn new(config: &TradingConfig) -> Result<Self, TraderError> {
        Ok(Self {
            aggregator: BarAggregator::new(config.ticks_per_kbar)?,
            engine: SignalEngine::new(config.fee_ticks, config.slippage_ticks),
            sizer: PositionSizer::new(
                config.initial_capital,
                config.risk_per_trade_pct,
                config.tick_value,
            ),
            slippage: config.slippage_ticks,
            recorder: None,
            last_tick: None,
        })
    }

    pub fn with_recorder(mut self, recorder: Box<dyn Recorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn last_tick(&self) -> Option<&Tick> {
        self.last_tick.as_ref()
    }

    pub fn bars_seen(&self) -> usize {
        self.engine.history().len()
    }

    pub fn pending_ticks(&self) -> usize {
        self.aggregator.pending()
    }

    /// Normalize a raw tick first; a malformed tick leaves the session untouched.
    pub fn on_raw_tick(&mut self, raw: &RawTick) -> Result<Option<Trade>, TraderError> {
        let tick = normalize_tick(raw)?;
        Ok(self.on_tick(tick))
    }

    /// Returns a sized trade setup when this tick closes a bar that signals.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Trade> {
        self.record(|r| r.record_tick(&tick));
        self.last_tick = Some(tick.clone());

        let bar = self.aggregator.consume(tick)?;
        let signal = self.engine.on_bar(bar)?;
        let size = self.sizer.size(signal.stop_distance);
        if size == 0 {
            log::warn!(
                "{} signal at {} skipped: stop {:.4} exceeds risk budget",
                signal.side,
                signal.price,
                signal.stop_distance
            );
            return None;
        }

        let trade = Trade::from_signal(&signal, self.slippage, size);
        log::info!(
            "{} x{} entry {:.2} stop {:.2} target {:.2}",
            trade.side,
            trade.size,
            trade.entry_price,
            trade.stop_price,
            trade.target_price
        );
        self.record(|r| r.record_trade(&trade));
        Some(trade)
    }

    fn record<F>(&mut self, call: F)
    where
        F: FnOnce(&mut dyn Recorder) -> Result<(), TraderError>,
    {
        if let Some(recorder) = self.recorder.as_deref_mut() {
            if let Err(e) = call(recorder) {
                log::debug!("recorder failure ignored: {}", e);
            }
        }
    }
}
