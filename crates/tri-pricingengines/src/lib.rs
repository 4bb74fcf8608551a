//! # tri-pricingengines
//!
//! Pricing engines built on the lattice methods:
//!
//! * [`TrinomialEngine`]: the full lattice pipeline for one contract
//! * [`ReferencePricer`]: Black-Scholes with an escrowed cash dividend
//! * [`GreeksEngine`]: finite-difference and tree-based sensitivities
//! * [`convergence`]: lattice-versus-reference diagnostics

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod convergence;
pub mod greeks;
pub mod pricer_parameters;
pub mod reference;
pub mod trinomial_engine;

pub use convergence::{convergence_profile, ConvergencePoint, GapEstimate};
pub use greeks::{
    Greeks, GreeksEngine, GreeksMode, DIVIDEND_BUMP, RATE_BUMP, SPOT_BUMP, TIME_BUMP_DAYS,
    VOLATILITY_BUMP,
};
pub use pricer_parameters::PricerParameters;
pub use reference::{black_scholes, ReferencePricer, ReferenceResults};
pub use trinomial_engine::{TrinomialEngine, TrinomialResults};
