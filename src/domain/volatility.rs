//! Average True Range over a bar series.
//!
//! TR[0] = high - low; TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|).
//! ATR[i] = simple mean of TR over the trailing `period` bars, or over all
//! bars so far while fewer than `period` exist. No warmup gaps.

use crate::domain::bar::Bar;

pub const DEFAULT_ATR_PERIOD: usize = 14;

pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

/// ATR series, same length as `bars`. A period of 0 behaves as 1.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let tr = true_ranges(bars);
    (0..tr.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            let window = &tr[start..=i];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Most recent ATR value, or `None` for an empty series.
///
/// Only the trailing `period + 1` bars influence the last value, so this
/// evaluates that tail instead of the whole history; the result is identical
/// to `calculate_atr(bars, period).last()`.
pub fn latest_atr(bars: &[Bar], period: usize) -> Option<f64> {
    let period = period.max(1);
    let start = bars.len().saturating_sub(period + 1);
    calculate_atr(&bars[start..], period).last().copied()
}
