//! Fixed-fractional position sizing.

pub const DEFAULT_RISK_PER_TRADE_PCT: f64 = 0.5;
pub const DEFAULT_TICK_VALUE: f64 = 10.0;

/// Whole contracts that risk at most `risk_pct`% of `capital` given the stop.
///
/// Returns 0 ("skip this trade") when the per-contract risk is not positive
/// or when the budget does not cover a single contract.
pub fn position_size(capital: f64, risk_pct: f64, stop_distance: f64, tick_value: f64) -> u64 {
    let risk_amount = capital * (risk_pct / 100.0);
    let per_contract_risk = stop_distance * tick_value;
    if per_contract_risk.is_nan() || per_contract_risk <= 0.0 {
        return 0;
    }
    let size = floor_div(risk_amount, per_contract_risk);
    if size >= 1.0 { size as u64 } else { 0 }
}

/// Floor of `a / b` for `b > 0`, taken on the exact quotient.
///
/// `(a / b).floor()` can round up first: `1.0 / 0.1` is `10.0` although
/// `0.1` as stored is slightly above one tenth.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem < 0.0 {
        div -= 1.0;
    }
    let floor = div.floor();
    if div - floor > 0.5 { floor + 1.0 } else { floor }
}

/// Sizing parameters held fixed for a session or a backtest run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizer {
    pub capital: f64,
    pub risk_pct: f64,
    pub tick_value: f64,
}

impl PositionSizer {
    pub fn new(capital: f64, risk_pct: f64, tick_value: f64) -> Self {
        Self {
            capital,
            risk_pct,
            tick_value,
        }
    }

    pub fn size(&self, stop_distance: f64) -> u64 {
        position_size(self.capital, self.risk_pct, stop_distance, self.tick_value)
    }
}
