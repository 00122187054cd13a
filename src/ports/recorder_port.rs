//! Append-only recording of ticks and trades on the live path.
//!
//! Implementations may fail; callers on the tick path treat every call as
//! best-effort and never let a failure change their control flow.

use crate::domain::error::TraderError;
use crate::domain::tick::Tick;
use crate::domain::trade::Trade;

pub trait Recorder {
    fn record_tick(&mut self, tick: &Tick) -> Result<(), TraderError>;

    fn record_trade(&mut self, trade: &Trade) -> Result<(), TraderError>;
}
