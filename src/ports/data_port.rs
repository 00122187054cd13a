//! Market data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::TraderError;
use crate::domain::tick::RawTick;

pub trait DataPort {
    /// Raw ticks in source order. Normalization is left to the caller.
    fn fetch_ticks(&self, source: &str) -> Result<Vec<RawTick>, TraderError>;

    /// Validated bars, ordered by time.
    fn fetch_bars(&self, source: &str) -> Result<Vec<Bar>, TraderError>;
}
