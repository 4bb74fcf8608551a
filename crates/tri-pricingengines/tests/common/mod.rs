//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use tri_core::Real;
use tri_instruments::{ExerciseStyle, OptionContract, OptionType};
use tri_market::MarketModel;
use tri_pricingengines::PricerParameters;
use tri_time::{date, Date};

/// Route `tracing` output to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn trade_date() -> Date {
    date(2025, 1, 1).unwrap()
}

/// One year after the trade date (365 days, so T = 1 exactly).
pub fn maturity() -> Date {
    date(2026, 1, 1).unwrap()
}

/// r = 4 %, σ = 25 %, S = 100, no dividend.
pub fn market() -> MarketModel {
    MarketModel::without_dividend(0.04, 0.25, 100.0).unwrap()
}

pub fn contract(kind: OptionType, style: ExerciseStyle, strike: Real) -> OptionContract {
    OptionContract::new(kind, style, strike, maturity()).unwrap()
}

pub fn european_call() -> OptionContract {
    contract(OptionType::Call, ExerciseStyle::European, 105.0)
}

pub fn params(step_count: usize) -> PricerParameters {
    PricerParameters::new(trade_date(), step_count)
}
