//! Tick-count bar aggregation.
//!
//! Every `ticks_per_bar` consecutive ticks become exactly one [`Bar`]. The
//! pending buffer always holds fewer than `ticks_per_bar` ticks between calls
//! and is emptied the moment a bar is emitted.

use crate::domain::bar::Bar;
use crate::domain::error::TraderError;
use crate::domain::tick::{normalize_tick, RawTick, Tick};

pub const DEFAULT_TICKS_PER_BAR: usize = 3;

#[derive(Debug, Clone)]
pub struct BarAggregator {
    ticks_per_bar: usize,
    buffer: Vec<Tick>,
}

impl BarAggregator {
    pub fn new(ticks_per_bar: usize) -> Result<Self, TraderError> {
        if ticks_per_bar == 0 {
            return Err(TraderError::ConfigInvalid {
                section: "strategy".into(),
                key: "ticks_per_kbar".into(),
                reason: "ticks_per_kbar must be at least 1".into(),
            });
        }
        Ok(Self {
            ticks_per_bar,
            buffer: Vec::new(),
        })
    }

    pub fn ticks_per_bar(&self) -> usize {
        self.ticks_per_bar
    }

    /// Number of ticks waiting for the current bar to close.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Append a tick; returns the completed bar when the buffer fills.
    pub fn consume(&mut self, tick: Tick) -> Option<Bar> {
        self.buffer.push(tick);
        if self.buffer.len() < self.ticks_per_bar {
            return None;
        }
        let bar = Bar::from_ticks(&self.buffer);
        self.buffer.clear();
        bar
    }

    /// Normalize and consume a raw tick. A malformed tick leaves the buffer untouched.
    pub fn consume_raw(&mut self, raw: &RawTick) -> Result<Option<Bar>, TraderError> {
        let tick = normalize_tick(raw)?;
        Ok(self.consume(tick))
    }
}

impl Default for BarAggregator {
    fn default() -> Self {
        Self {
            ticks_per_bar: DEFAULT_TICKS_PER_BAR,
            buffer: Vec::new(),
        }
    }
}

/// Offline conversion: sort ticks by time (stable), then aggregate.
///
/// A trailing partial buffer is discarded.
pub fn ticks_to_bars(mut ticks: Vec<Tick>, ticks_per_bar: usize) -> Result<Vec<Bar>, TraderError> {
    let mut aggregator = BarAggregator::new(ticks_per_bar)?;
    ticks.sort_by_key(|t| t.time);
    let bars: Vec<Bar> = ticks
        .into_iter()
        .filter_map(|t| aggregator.consume(t))
        .collect();
    if aggregator.pending() > 0 {
        log::debug!(
            "discarding {} trailing ticks short of a full bar",
            aggregator.pending()
        );
    }
    Ok(bars)
}
