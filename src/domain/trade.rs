//! Sized trade setups derived from signals.

use crate::domain::signal::{Side, Signal};

/// Target distance as a multiple of the stop distance.
pub const REWARD_RISK_RATIO: f64 = 1.8;

/// A hypothetical entry with protective stop and profit target. Never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub side: Side,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target_price: f64,
    pub size: u64,
}

impl Trade {
    /// Apply slippage against the trader and place stop/target around the entry.
    pub fn from_signal(signal: &Signal, slippage: f64, size: u64) -> Self {
        let sign = signal.side.sign();
        let entry_price = signal.price + sign * slippage;
        Trade {
            side: signal.side,
            entry_price,
            stop_price: entry_price - sign * signal.stop_distance,
            target_price: entry_price + sign * REWARD_RISK_RATIO * signal.stop_distance,
            size,
        }
    }
}
