//! Core domain types and logic.

pub mod tick;
pub mod time;
pub mod bar;
pub mod aggregator;
pub mod volatility;
pub mod signal;
pub mod sizing;
pub mod trade;
pub mod backtest;
pub mod session;
pub mod config;
pub mod config_validation;
pub mod error;
