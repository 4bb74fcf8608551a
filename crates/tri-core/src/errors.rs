//! Error types for the trinomial pricer.
//!
//! Every failure of a pricing call is one of four kinds: bad inputs, an
//! unstable lattice parameterisation, a lattice emptied by pruning, or a
//! lattice too shallow for tree-based Greeks. Errors are plain values; a
//! failed call leaves nothing behind.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Inputs rejected before any lattice work begins.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Derived transition probabilities fell outside [0, 1].
    ///
    /// The step size is too coarse for the volatility; increase the step
    /// count.
    #[error(
        "lattice instability: p_up={p_up:.6e}, p_mid={p_mid:.6e}, p_down={p_down:.6e} \
         (dt={dt:.6e}, volatility={volatility}, steps={step_count})"
    )]
    LatticeInstability {
        /// Probability of the up branch.
        p_up: f64,
        /// Probability of the middle branch.
        p_mid: f64,
        /// Probability of the down branch.
        p_down: f64,
        /// Time step in years.
        dt: f64,
        /// Annualised volatility.
        volatility: f64,
        /// Number of time steps requested.
        step_count: usize,
    },

    /// Pruning removed every node at some level.
    #[error("degenerate lattice: no live nodes at level {level}")]
    DegenerateLattice {
        /// First level without a live node.
        level: usize,
    },

    /// Tree-based Greeks need the three level-1 nodes around the trunk.
    #[error("insufficient lattice depth: level-1 node at offset {offset} is pruned or absent")]
    InsufficientLatticeDepth {
        /// Offset from the trunk of the missing node.
        offset: i32,
    },
}

impl Error {
    /// `true` when the caller can recover by switching to finite-difference
    /// Greeks.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InsufficientLatticeDepth { .. })
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidInput(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tri_core::{ensure, errors::Error};
/// fn positive(x: f64) -> tri_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert_eq!(
///     positive(-1.0),
///     Err(Error::InvalidInput("x must be positive, got -1".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidInput(
                format!($($msg)*)
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_steps(n: usize) -> Result<usize> {
        ensure!(n >= 1, "step count must be >= 1, got {n}");
        Ok(n)
    }

    #[test]
    fn ensure_maps_to_invalid_input() {
        assert_eq!(checked_steps(3), Ok(3));
        match checked_steps(0) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("got 0")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_depth_errors_are_recoverable() {
        assert!(Error::InsufficientLatticeDepth { offset: 1 }.is_recoverable());
        assert!(!Error::DegenerateLattice { level: 3 }.is_recoverable());
        assert!(!Error::InvalidInput("x".into()).is_recoverable());
    }

    #[test]
    fn instability_message_names_parameters() {
        let e = Error::LatticeInstability {
            p_up: 0.05,
            p_mid: -0.01,
            p_down: 0.96,
            dt: 1.0,
            volatility: 2.0,
            step_count: 1,
        };
        let msg = e.to_string();
        assert!(msg.starts_with("lattice instability"));
        assert!(msg.contains("steps=1"));
        assert!(msg.contains("volatility=2"));
    }
}
