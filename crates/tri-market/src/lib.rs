//! # tri-market
//!
//! Market state consumed by the pricing engines.
//!
//! A [`MarketModel`] is an immutable snapshot of spot, rate, volatility and
//! at most one discrete cash [`Dividend`]. Sensitivity calculations never
//! mutate a model; they build a bumped copy with one of the `with_*`
//! constructors, which re-validate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Discrete cash dividend.
pub mod dividend;

/// Market snapshot.
pub mod market_model;

pub use dividend::Dividend;
pub use market_model::MarketModel;
