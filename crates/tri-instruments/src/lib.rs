//! # tri-instruments
//!
//! Vanilla option contracts, their payoffs, and the [`PricingEngine`] trait
//! implemented by every engine in the workspace.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use exercise::ExerciseStyle;
pub use instrument::{PricingEngine, PricingResults};
pub use option::OptionContract;
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
