//! CSV file data and report adapter.

use crate::domain::bar::{Bar, BarRecord};
use crate::domain::error::TraderError;
use crate::domain::tick::RawTick;
use crate::domain::time::format_timestamp;
use crate::domain::trade::Trade;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use std::path::PathBuf;

pub const BAR_COLUMNS: [&str; 6] = ["time", "open", "high", "low", "close", "volume"];
pub const TRADE_COLUMNS: [&str; 5] = ["side", "entry", "stop", "target", "size"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Relative sources resolve against the base path; absolute ones are kept.
    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }

    fn reader(&self, source: &str) -> Result<csv::Reader<std::fs::File>, TraderError> {
        let path = self.csv_path(source);
        csv::Reader::from_path(&path).map_err(|e| TraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }

    fn writer(&self, output_path: &str) -> Result<csv::Writer<std::fs::File>, TraderError> {
        let path = self.csv_path(output_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        csv::Writer::from_path(&path).map_err(|e| TraderError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })
    }
}

fn write_error(e: csv::Error) -> TraderError {
    TraderError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ticks(&self, source: &str) -> Result<Vec<RawTick>, TraderError> {
        let mut rdr = self.reader(source)?;
        let mut ticks = Vec::new();
        for (row, result) in rdr.deserialize::<RawTick>().enumerate() {
            let tick = result.map_err(|e| TraderError::Data {
                reason: format!("CSV parse error at row {}: {}", row + 1, e),
            })?;
            ticks.push(tick);
        }
        Ok(ticks)
    }

    fn fetch_bars(&self, source: &str) -> Result<Vec<Bar>, TraderError> {
        let mut rdr = self.reader(source)?;
        let headers = rdr.headers().map_err(|e| TraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        for column in BAR_COLUMNS {
            if !headers.iter().any(|h| h.trim() == column) {
                return Err(TraderError::InvalidBar {
                    reason: format!("missing {} column", column),
                });
            }
        }

        let mut bars = Vec::new();
        for (row, result) in rdr.deserialize::<BarRecord>().enumerate() {
            let record = result.map_err(|e| TraderError::Data {
                reason: format!("CSV parse error at row {}: {}", row + 1, e),
            })?;
            bars.push(Bar::try_from(record)?);
        }

        bars.sort_by_key(|b| b.time);
        Ok(bars)
    }
}

impl ReportPort for CsvAdapter {
    fn write_trades(&self, trades: &[Trade], output_path: &str) -> Result<(), TraderError> {
        let mut wtr = self.writer(output_path)?;
        wtr.write_record(TRADE_COLUMNS).map_err(write_error)?;
        for t in trades {
            wtr.write_record([
                t.side.to_string(),
                t.entry_price.to_string(),
                t.stop_price.to_string(),
                t.target_price.to_string(),
                t.size.to_string(),
            ])
            .map_err(write_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_bars(&self, bars: &[Bar], output_path: &str) -> Result<(), TraderError> {
        let mut wtr = self.writer(output_path)?;
        wtr.write_record(BAR_COLUMNS).map_err(write_error)?;
        for b in bars {
            wtr.write_record([
                format_timestamp(&b.time),
                b.open.to_string(),
                b.high.to_string(),
                b.low.to_string(),
                b.close.to_string(),
                b.volume.to_string(),
            ])
            .map_err(write_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
