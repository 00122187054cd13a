//! Tick records and the boundary normalization from raw broker/CSV ticks.

use crate::domain::error::TraderError;
use crate::domain::time::parse_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// A single trade print as consumed by the aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub time: NaiveDateTime,
    pub price: f64,
    pub volume: u64,
}

/// A tick as delivered by an external source, where any field may be absent.
///
/// Extra columns in tick files (bid, ask, ...) are ignored on deserialization.
/// Cells never fail the read: an unreadable timestamp is `None` and an
/// unreadable number is NaN, so [`normalize_tick`] rejects just that row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTick {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    /// Fractional volumes such as `12.0` come from pandas-written files.
    #[serde(default, deserialize_with = "lenient_number")]
    pub volume: Option<f64>,
}

impl RawTick {
    pub fn new(time: NaiveDateTime, price: f64, volume: u64) -> Self {
        Self {
            time: Some(time),
            price: Some(price),
            volume: Some(volume as f64),
        }
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse().unwrap_or(f64::NAN)),
    })
}

/// Convert a raw tick into a [`Tick`].
///
/// Missing volume defaults to 0 and fractional volume truncates. A missing
/// timestamp, a missing, non-finite or non-positive price, or a negative or
/// non-finite volume is rejected.
pub fn normalize_tick(raw: &RawTick) -> Result<Tick, TraderError> {
    let time = raw.time.ok_or_else(|| TraderError::InvalidTick {
        reason: "missing or unreadable timestamp".into(),
    })?;
    let price = raw.price.ok_or_else(|| TraderError::InvalidTick {
        reason: "missing price".into(),
    })?;
    if !price.is_finite() || price <= 0.0 {
        return Err(TraderError::InvalidTick {
            reason: format!("price must be positive, got {}", price),
        });
    }
    let volume = match raw.volume {
        None => 0,
        Some(v) if v.is_finite() && v >= 0.0 => v as u64,
        Some(v) => {
            return Err(TraderError::InvalidTick {
                reason: format!("volume must be non-negative, got {}", v),
            });
        }
    };
    Ok(Tick {
        time,
        price,
        volume,
    })
}

impl TryFrom<&RawTick> for Tick {
    type Error = TraderError;

    fn try_from(raw: &RawTick) -> Result<Self, Self::Error> {
        normalize_tick(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 26)
            .unwrap()
            .and_hms_opt(9, 0, sec)
            .unwrap()
    }

    #[test]
    fn normalize_complete_tick() {
        let tick = normalize_tick(&RawTick::new(ts(1), 21500.0, 3)).unwrap();
        assert_eq!(tick.time, ts(1));
        assert_eq!(tick.price, 21500.0);
        assert_eq!(tick.volume, 3);
    }

    #[test]
    fn missing_volume_defaults_to_zero() {
        let raw = RawTick {
            volume: None,
            ..RawTick::new(ts(1), 100.0, 9)
        };
        assert_eq!(normalize_tick(&raw).unwrap().volume, 0);
    }

    #[test]
    fn missing_price_rejected() {
        let raw = RawTick {
            price: None,
            ..RawTick::new(ts(1), 100.0, 1)
        };
        let err = normalize_tick(&raw).unwrap_err();
        assert!(matches!(err, TraderError::InvalidTick { reason } if reason.contains("price")));
    }

    #[test]
    fn missing_time_rejected() {
        let raw = RawTick {
            time: None,
            ..RawTick::new(ts(1), 100.0, 1)
        };
        let err = normalize_tick(&raw).unwrap_err();
        assert!(matches!(err, TraderError::InvalidTick { reason } if reason.contains("timestamp")));
    }

    #[test]
    fn non_positive_price_rejected() {
        assert!(normalize_tick(&RawTick::new(ts(1), 0.0, 1)).is_err());
        assert!(normalize_tick(&RawTick::new(ts(1), -5.0, 1)).is_err());
        assert!(normalize_tick(&RawTick::new(ts(1), f64::NAN, 1)).is_err());
    }

    #[test]
    fn fractional_volume_truncates() {
        let raw = RawTick {
            volume: Some(12.0),
            ..RawTick::new(ts(1), 100.0, 0)
        };
        assert_eq!(normalize_tick(&raw).unwrap().volume, 12);
    }

    #[test]
    fn bad_volume_rejected() {
        for volume in [-1.0, f64::NAN] {
            let raw = RawTick {
                volume: Some(volume),
                ..RawTick::new(ts(1), 100.0, 0)
            };
            let err = normalize_tick(&raw).unwrap_err();
            assert!(matches!(err, TraderError::InvalidTick { reason } if reason.contains("volume")));
        }
    }

    #[test]
    fn unreadable_cells_reach_normalization() {
        let data = "time,price,volume\n\
                    2025-11-26 09:00:01,100,1.0\n\
                    yesterday,101,1\n\
                    2025-11-26 09:00:03,abc,1\n\
                    2025-11-26 09:00:04,102,lots\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<RawTick> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 4);

        assert_eq!(normalize_tick(&rows[0]).unwrap().volume, 1);
        assert!(rows[1].time.is_none());
        for row in &rows[1..] {
            assert!(matches!(normalize_tick(row), Err(TraderError::InvalidTick { .. })));
        }
    }

    #[test]
    fn try_from_matches_normalize() {
        let raw = RawTick::new(ts(2), 101.5, 4);
        let tick: Tick = (&raw).try_into().unwrap();
        assert_eq!(tick, normalize_tick(&raw).unwrap());
    }
}
