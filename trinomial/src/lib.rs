//! # trinomial
//!
//! Recombining trinomial lattice pricer for European and American vanilla
//! options with one discrete cash dividend, checked against a Black-Scholes
//! reference.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than the individual `tri-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use trinomial::prelude::*;
//!
//! let trade = date(2025, 1, 1)?;
//! let market = MarketModel::new(0.04, 0.25, 100.0, 2.0, Some(date(2025, 6, 30)?))?;
//! let put = OptionContract::new(OptionType::Put, ExerciseStyle::American, 105.0, date(2026, 1, 1)?)?;
//!
//! let params = PricerParameters::new(trade, 200).with_pruning(PruningPolicy::ByProbability(1e-9));
//! let result = TrinomialEngine::new(params).price(&market, &put)?;
//! assert!(result.price > 0.0);
//!
//! let greeks = GreeksEngine::new(params).compute(&market, &put, GreeksMode::TreeBased)?;
//! assert!(greeks.delta < 0.0);
//! # Ok::<(), trinomial::core::Error>(())
//! ```
//!
//! ## Features
//!
//! * `parallel`: price the nodes of each level on the rayon thread pool
//! * `serde`: `Serialize`/`Deserialize` for parameters and results

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use tri_core as core;

/// Dates and day counters.
pub use tri_time as time;

/// Normal distribution and comparison helpers.
pub use tri_math as math;

/// Market inputs.
pub use tri_market as market;

/// Option contracts and the engine interface.
pub use tri_instruments as instruments;

/// Lattice construction and backward induction.
pub use tri_methods as methods;

/// Pricing engines, Greeks and diagnostics.
pub use tri_pricingengines as pricingengines;

/// The types needed for everyday pricing.
pub mod prelude {
    pub use tri_core::{Error, Real, Result};
    pub use tri_instruments::{ExerciseStyle, OptionContract, OptionType, PricingEngine};
    pub use tri_market::MarketModel;
    pub use tri_methods::{ExerciseBoundary, PruningPolicy};
    pub use tri_pricingengines::{
        Greeks, GreeksEngine, GreeksMode, PricerParameters, ReferencePricer, TrinomialEngine,
        TrinomialResults,
    };
    pub use tri_time::{date, Date};
}
