//! Configuration validation.
//!
//! Validates all config fields before a backtest or live session is built.

use crate::domain::error::TraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_fee_ticks(config)?;
    validate_slippage(config)?;
    validate_ticks_per_kbar(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_initial_capital(config)?;
    validate_risk_per_trade(config)?;
    validate_tick_value(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TraderError {
    TraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_fee_ticks(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("strategy", "fee_ticks", 4.0);
    if value <= 0.0 {
        return Err(invalid("strategy", "fee_ticks", "fee_ticks must be positive"));
    }
    Ok(())
}

fn validate_slippage(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("strategy", "slippage_ticks", 0.5);
    if value < 0.0 {
        return Err(invalid(
            "strategy",
            "slippage_ticks",
            "slippage_ticks must be non-negative",
        ));
    }
    Ok(())
}

fn validate_ticks_per_kbar(config: &dyn ConfigPort) -> Result<(), TraderError> {
    if let Some(raw) = config.get_string("strategy", "ticks_per_kbar") {
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 => {}
            _ => {
                return Err(invalid(
                    "strategy",
                    "ticks_per_kbar",
                    "ticks_per_kbar must be a positive integer",
                ));
            }
        }
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TraderError> {
    if config.get_string("backtest", "initial_capital").is_none() {
        return Err(TraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
        });
    }
    let value = config.get_double("backtest", "initial_capital", 0.0);
    if value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_risk_per_trade(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("backtest", "risk_per_trade_pct", 0.5);
    if value <= 0.0 || value > 100.0 {
        return Err(invalid(
            "backtest",
            "risk_per_trade_pct",
            "risk_per_trade_pct must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_tick_value(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = config.get_double("backtest", "tick_value", 10.0);
    if value <= 0.0 {
        return Err(invalid("backtest", "tick_value", "tick_value must be positive"));
    }
    Ok(())
}
