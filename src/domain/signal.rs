//! Three-bar momentum signal engine.
//!
//! The engine owns an append-only bar history. Once at least
//! [`WARMUP_BARS`] bars are held, three strictly rising closes give a buy and
//! three strictly falling closes give a sell. The stop distance is
//! `max(1.2 * ATR(14), fee_ticks)`.

use crate::domain::bar::Bar;
use crate::domain::volatility::{latest_atr, DEFAULT_ATR_PERIOD};
use std::fmt;

pub const WARMUP_BARS: usize = 15;
pub const ATR_STOP_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for buy, -1 for sell.
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub side: Side,
    pub price: f64,
    pub stop_distance: f64,
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    fee_ticks: f64,
    slippage: f64,
    history: Vec<Bar>,
}

impl SignalEngine {
    pub fn new(fee_ticks: f64, slippage: f64) -> Self {
        Self {
            fee_ticks,
            slippage,
            history: Vec::new(),
        }
    }

    pub fn fee_ticks(&self) -> f64 {
        self.fee_ticks
    }

    /// Carried for whoever turns a signal into a trade; unused here.
    pub fn slippage(&self) -> f64 {
        self.slippage
    }

    pub fn history(&self) -> &[Bar] {
        &self.history
    }

    pub fn on_bar(&mut self, bar: Bar) -> Option<Signal> {
        self.history.push(bar);
        if self.history.len() < WARMUP_BARS {
            return None;
        }

        let side = direction(&self.history)?;
        let atr = latest_atr(&self.history, DEFAULT_ATR_PERIOD)?;
        let price = self.history.last()?.close;
        let stop_distance = (ATR_STOP_MULTIPLIER * atr).max(self.fee_ticks);

        log::info!(
            "bar {}: {} signal at {} (atr {:.4}, stop {:.4})",
            self.history.len(),
            side,
            price,
            atr,
            stop_distance
        );

        Some(Signal {
            side,
            price,
            stop_distance,
        })
    }
}

/// Direction of the last three closes: strictly rising, strictly falling, or none.
fn direction(history: &[Bar]) -> Option<Side> {
    let n = history.len();
    if n < 3 {
        return None;
    }
    let (a, b, c) = (history[n - 3].close, history[n - 2].close, history[n - 1].close);
    if a < b && b < c {
        Some(Side::Buy)
    } else if a > b && b > c {
        Some(Side::Sell)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    /// Bars with high/low four points either side of close (TR = 8 while
    /// consecutive closes move by less than 4).
    fn bars_with_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                time: NaiveDate::from_ymd_opt(2025, 11, 26)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap()
                    + chrono::Duration::seconds(i as i64),
                open: close,
                high: close + 4.0,
                low: close - 4.0,
                close,
                volume: 3,
            })
            .collect()
    }

    fn feed(engine: &mut SignalEngine, bars: Vec<Bar>) -> Vec<Option<Signal>> {
        bars.into_iter().map(|b| engine.on_bar(b)).collect()
    }

    #[test]
    fn warmup_withholds_signals() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let mut engine = SignalEngine::new(4.0, 0.5);
        let out = feed(&mut engine, bars_with_closes(&closes));
        assert!(out.iter().all(Option::is_none));
        assert_eq!(engine.history().len(), 14);
    }

    #[test]
    fn rising_closes_emit_buy() {
        let mut closes = vec![100.0; 12];
        closes.extend([100.5, 101.0, 102.0]);
        let mut engine = SignalEngine::new(4.0, 0.5);
        let signal = feed(&mut engine, bars_with_closes(&closes))
            .pop()
            .flatten()
            .unwrap();
        assert_eq!(signal.side, Side::Buy);
        assert_eq!(signal.price, 102.0);
        // ATR14 = 8 → stop = max(9.6, 4)
        assert_relative_eq!(signal.stop_distance, 9.6, epsilon = 1e-9);
    }

    #[test]
    fn falling_closes_emit_sell() {
        let mut closes = vec![100.0; 12];
        closes.extend([99.0, 98.0, 97.0]);
        let mut engine = SignalEngine::new(4.0, 0.5);
        let signal = feed(&mut engine, bars_with_closes(&closes))
            .pop()
            .flatten()
            .unwrap();
        assert_eq!(signal.side, Side::Sell);
        assert_eq!(signal.price, 97.0);
        assert_relative_eq!(signal.stop_distance, 9.6, epsilon = 1e-9);
    }

    #[test]
    fn ties_are_not_momentum() {
        let mut closes = vec![100.0; 12];
        closes.extend([101.0, 101.0, 102.0]);
        let mut engine = SignalEngine::new(4.0, 0.5);
        assert!(feed(&mut engine, bars_with_closes(&closes)).pop().flatten().is_none());
    }

    #[test]
    fn mixed_direction_is_silent() {
        let mut closes = vec![100.0; 12];
        closes.extend([101.0, 99.0, 102.0]);
        let mut engine = SignalEngine::new(4.0, 0.5);
        assert!(feed(&mut engine, bars_with_closes(&closes)).pop().flatten().is_none());
    }

    #[test]
    fn fee_floor_applies_when_atr_small() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64 * 0.01).collect();
        let bars: Vec<Bar> = bars_with_closes(&closes)
            .into_iter()
            .map(|mut b| {
                b.high = b.close + 0.5;
                b.low = b.close - 0.5;
                b
            })
            .collect();
        let mut engine = SignalEngine::new(4.0, 0.5);
        let signal = feed(&mut engine, bars).pop().flatten().unwrap();
        assert_eq!(signal.stop_distance, 4.0);
    }

    #[test]
    fn history_keeps_growing_after_warmup() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let mut engine = SignalEngine::new(1.0, 0.0);
        let out = feed(&mut engine, bars_with_closes(&closes));
        assert_eq!(engine.history().len(), 30);
        assert_eq!(out.iter().filter(|s| s.is_some()).count(), 16);
    }

    #[test]
    fn side_display_and_sign() {
        assert_eq!(Side::Buy.to_string(), "buy");
        assert_eq!(Side::Sell.to_string(), "sell");
        assert_eq!(Side::Buy.sign(), 1.0);
        assert_eq!(Side::Sell.sign(), -1.0);
    }
}
