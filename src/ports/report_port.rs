//! Output port for derived bars and backtest trade logs.

use crate::domain::bar::Bar;
use crate::domain::error::TraderError;
use crate::domain::trade::Trade;

pub trait ReportPort {
    fn write_trades(&self, trades: &[Trade], output_path: &str) -> Result<(), TraderError>;

    fn write_bars(&self, bars: &[Bar], output_path: &str) -> Result<(), TraderError>;
}
