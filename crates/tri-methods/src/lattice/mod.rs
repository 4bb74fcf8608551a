//! Recombining trinomial lattice.
//!
//! # Overview
//!
//! * [`LatticeParameters`]: step size, spacing factor, discount factor and
//!   the three branch probabilities used off the dividend crossing
//! * [`PruningPolicy`]: which nodes are dropped while the lattice grows
//! * [`LatticeBuilder`]: grows the levels of a [`Lattice`]
//! * [`Level`] / [`Node`]: per-level node arenas addressed by offset from
//!   the trunk, with an optional per-node [`Branching`]

pub mod builder;
pub mod node;
pub mod parameters;
pub mod pruning;

pub use builder::{Lattice, LatticeBuilder, NodeStatistics, DIVIDEND_DATE_TOLERANCE};
pub use node::{Branching, Level, Node};
pub use parameters::{LatticeParameters, PROBABILITY_TOLERANCE};
pub use pruning::{PruneRule, PruningPolicy};
