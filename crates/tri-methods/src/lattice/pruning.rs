//! Lattice pruning.
//!
//! A [`PruningPolicy`] is the user-facing choice. The builder turns it into
//! a [`PruneRule`] once per lattice and grows the levels generically over
//! that rule, so the per-node test is monomorphised.

use tri_core::{ensure, Probability, Real, Result, Size};

/// Which nodes to drop while the lattice grows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PruningPolicy {
    /// Keep every node.
    #[default]
    None,
    /// Drop nodes whose path probability is below the threshold, in `[0, 1)`.
    ByProbability(Probability),
    /// Drop nodes further than `width` standard deviations of log-spot from
    /// the trunk. `width > 0`.
    ByStdDev(Real),
}

impl PruningPolicy {
    /// Check the policy parameter.
    pub fn validate(&self) -> Result<()> {
        match *self {
            PruningPolicy::None => {}
            PruningPolicy::ByProbability(t) => {
                ensure!(
                    (0.0..1.0).contains(&t),
                    "pruning probability threshold must lie in [0, 1), got {t}"
                );
            }
            PruningPolicy::ByStdDev(w) => {
                ensure!(
                    w.is_finite() && w > 0.0,
                    "pruning width must be positive, got {w}"
                );
            }
        }
        Ok(())
    }
}

/// Per-node pruning test.
pub trait PruneRule: Copy + Send + Sync {
    /// `true` if the node at `level`, `offset` with the given path
    /// probability should be dropped.
    fn prune(&self, level: Size, offset: i32, path_probability: Probability) -> bool;
}

/// Never prunes.
#[derive(Debug, Clone, Copy)]
pub struct NoPruning;

impl PruneRule for NoPruning {
    #[inline(always)]
    fn prune(&self, _: Size, _: i32, _: Probability) -> bool {
        false
    }
}

/// Prunes below a path-probability floor.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityFloor {
    /// Nodes with a smaller path probability are dropped.
    pub threshold: Probability,
}

impl PruneRule for ProbabilityFloor {
    #[inline]
    fn prune(&self, _: Size, _: i32, path_probability: Probability) -> bool {
        path_probability < self.threshold
    }
}

/// Prunes outside a band around the trunk.
///
/// The log-spacing is `σ √(3Δt)` and the log-spot standard deviation at
/// level `i` is `σ √(iΔt)`, so `|j| σ √(3Δt) > w σ √(iΔt)` reduces to
/// `|j| √3 > w √i`.
#[derive(Debug, Clone, Copy)]
pub struct StdDevBand {
    /// Band half-width in standard deviations.
    pub width: Real,
}

impl PruneRule for StdDevBand {
    #[inline]
    fn prune(&self, level: Size, offset: i32, _: Probability) -> bool {
        offset.unsigned_abs() as Real * 3.0_f64.sqrt() > self.width * (level as Real).sqrt()
    }
}
