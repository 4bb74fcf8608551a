//! Early-exercise boundary.

use tri_core::{Real, Size, Time};
use tri_instruments::OptionType;

/// Per-level critical spot of an American option.
///
/// For a put this is the largest spot at which exercise is optimal; for a
/// call, the smallest. Levels without any exercised node hold `None`, and
/// so does the terminal level, where exercise is not early.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExerciseBoundary {
    option_type: OptionType,
    thresholds: Vec<Option<Real>>,
    dt: Time,
}

impl ExerciseBoundary {
    /// An empty boundary for a `step_count`-step lattice.
    pub fn new(option_type: OptionType, step_count: Size, dt: Time) -> Self {
        Self {
            option_type,
            thresholds: vec![None; step_count + 1],
            dt,
        }
    }

    /// Fold the spot of an exercised node at `level` into the boundary.
    pub fn record(&mut self, level: Size, spot: Real) {
        let Some(slot) = self.thresholds.get_mut(level) else {
            return;
        };
        *slot = Some(match (*slot, self.option_type) {
            (None, _) => spot,
            (Some(b), OptionType::Call) => b.min(spot),
            (Some(b), OptionType::Put) => b.max(spot),
        });
    }

    /// Option type the boundary belongs to.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Step size, mapping level `i` to time `i · dt`.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Threshold at `level`.
    pub fn at_level(&self, level: Size) -> Option<Real> {
        self.thresholds.get(level).copied().flatten()
    }

    /// All thresholds, indexed by level.
    pub fn thresholds(&self) -> &[Option<Real>] {
        &self.thresholds
    }

    /// `(time, spot)` for every level with an exercise point.
    pub fn points(&self) -> impl Iterator<Item = (Time, Real)> + '_ {
        self.thresholds
            .iter()
            .enumerate()
            .filter_map(move |(i, b)| b.map(|s| (i as Real * self.dt, s)))
    }

    /// `true` when no level recorded an exercise.
    pub fn is_empty(&self) -> bool {
        self.thresholds.iter().all(Option::is_none)
    }
}
