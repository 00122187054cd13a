//! Append-only CSV recorder for live ticks and trade setups.

use crate::domain::error::TraderError;
use crate::domain::tick::Tick;
use crate::domain::time::format_timestamp;
use crate::domain::trade::Trade;
use crate::ports::recorder_port::Recorder;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// One lazily opened append-mode CSV file.
struct CsvSink {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
}

impl CsvSink {
    fn new(path: PathBuf) -> Self {
        Self { path, writer: None }
    }

    fn open(&mut self) -> Result<&mut csv::Writer<File>, TraderError> {
        if self.writer.is_none() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.writer = Some(csv::WriterBuilder::new().has_headers(false).from_writer(file));
        }
        self.writer.as_mut().ok_or_else(|| TraderError::Record {
            reason: format!("{} is not open", self.path.display()),
        })
    }

    fn append<I, T>(&mut self, row: I) -> Result<(), TraderError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let path = self.path.display().to_string();
        let writer = self.open()?;
        writer.write_record(row).map_err(|e| TraderError::Record {
            reason: format!("{}: {}", path, e),
        })?;
        writer.flush()?;
        Ok(())
    }
}

/// Records ticks as `time,price,volume` and trades as
/// `side,entry,stop,target,size`. Either file may be omitted.
pub struct CsvRecorder {
    ticks: Option<CsvSink>,
    trades: Option<CsvSink>,
}

impl CsvRecorder {
    pub fn new(tick_path: Option<&Path>, trade_path: Option<&Path>) -> Self {
        Self {
            ticks: tick_path.map(|p| CsvSink::new(p.to_path_buf())),
            trades: trade_path.map(|p| CsvSink::new(p.to_path_buf())),
        }
    }

    /// Drop open handles; the next record reopens in append mode.
    pub fn close(&mut self) {
        for sink in [self.ticks.as_mut(), self.trades.as_mut()].into_iter().flatten() {
            sink.writer = None;
        }
    }
}

impl Recorder for CsvRecorder {
    fn record_tick(&mut self, tick: &Tick) -> Result<(), TraderError> {
        match self.ticks.as_mut() {
            Some(sink) => sink.append([
                format_timestamp(&tick.time),
                tick.price.to_string(),
                tick.volume.to_string(),
            ]),
            None => Ok(()),
        }
    }

    fn record_trade(&mut self, trade: &Trade) -> Result<(), TraderError> {
        match self.trades.as_mut() {
            Some(sink) => sink.append([
                trade.side.to_string(),
                trade.entry_price.to_string(),
                trade.stop_price.to_string(),
                trade.target_price.to_string(),
                trade.size.to_string(),
            ]),
            None => Ok(()),
        }
    }
}
