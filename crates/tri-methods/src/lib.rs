//! # tri-methods
//!
//! Numerical methods for the trinomial pricer.
//!
//! * [`lattice`] derives the branching parameters and grows the recombining
//!   lattice (dividend adjustment, pruning, path probabilities).
//! * [`valuation`] rolls option values back through a grown lattice and
//!   records the early-exercise boundary.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod lattice;
pub mod valuation;

pub use lattice::{
    Branching, Lattice, LatticeBuilder, LatticeParameters, Level, Node, NodeStatistics, PruningPolicy,
    DIVIDEND_DATE_TOLERANCE, PROBABILITY_TOLERANCE,
};
pub use valuation::{ExerciseBoundary, Valuation, Valuator};
