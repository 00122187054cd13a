//! Fixed-count OHLCV bar (kbar) representation.

use crate::domain::error::TraderError;
use crate::domain::tick::Tick;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// An immutable OHLCV aggregate. `time` is the timestamp of the last tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Build a bar from a non-empty run of ticks in arrival order.
    pub fn from_ticks(ticks: &[Tick]) -> Option<Bar> {
        let first = ticks.first()?;
        let last = ticks.last()?;
        let (high, low) = ticks
            .iter()
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(h, l), t| {
                (h.max(t.price), l.min(t.price))
            });
        Some(Bar {
            time: last.time,
            open: first.price,
            high,
            low,
            close: last.price,
            volume: ticks.iter().map(|t| t.volume).sum(),
        })
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// A bar row as read from a tabular source. Every column is required;
/// absent cells surface as [`TraderError::InvalidBar`] on conversion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BarRecord {
    #[serde(default, deserialize_with = "crate::domain::time::deserialize_opt")]
    pub time: Option<NaiveDateTime>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl TryFrom<BarRecord> for Bar {
    type Error = TraderError;

    fn try_from(rec: BarRecord) -> Result<Self, Self::Error> {
        fn required(value: Option<f64>, column: &str) -> Result<f64, TraderError> {
            match value {
                Some(v) if v.is_finite() => Ok(v),
                Some(v) => Err(TraderError::InvalidBar {
                    reason: format!("non-finite {} value {}", column, v),
                }),
                None => Err(TraderError::InvalidBar {
                    reason: format!("missing {} column", column),
                }),
            }
        }

        let time = rec.time.ok_or_else(|| TraderError::InvalidBar {
            reason: "missing time column".into(),
        })?;
        let open = required(rec.open, "open")?;
        let high = required(rec.high, "high")?;
        let low = required(rec.low, "low")?;
        let close = required(rec.close, "close")?;
        // Volumes may arrive as "12.0" from pandas-written files.
        let volume = required(rec.volume, "volume")?;
        if volume < 0.0 {
            return Err(TraderError::InvalidBar {
                reason: format!("negative volume {}", volume),
            });
        }
        let volume = volume as u64;

        Ok(Bar {
            time,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}
