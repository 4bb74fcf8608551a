//! Backward induction over a grown lattice.
//!
//! Terminal nodes take the payoff. Each earlier live node takes the
//! discounted expectation of its three children (its level's
//! [`Branching`](crate::lattice::Branching) when it has one), where a pruned
//! or absent child is worth zero. For American contracts a node whose payoff strictly
//! exceeds that continuation value is exercised, and its spot feeds the
//! [`ExerciseBoundary`].
//!
//! Levels are consumed from the back; each is dropped once the level before
//! it is priced, except level 1, which is kept for tree-based Greeks.

pub mod boundary;

pub use boundary::ExerciseBoundary;

use crate::lattice::{Lattice, LatticeParameters, Level, Node};
use tri_core::{Error, Price, Result};
use tri_instruments::{ExerciseStyle, OptionContract};

/// Output of a backward induction.
#[derive(Debug, Clone)]
pub struct Valuation {
    /// Value at the root.
    pub price: Price,
    /// Early-exercise boundary; `None` for European contracts.
    pub exercise_boundary: Option<ExerciseBoundary>,
    /// The priced level 1.
    pub first_level: Option<Level>,
}

/// Rolls option values back through a [`Lattice`].
#[derive(Debug, Clone, Copy)]
pub struct Valuator<'a> {
    contract: &'a OptionContract,
}

impl<'a> Valuator<'a> {
    /// A valuator for `contract`.
    pub fn new(contract: &'a OptionContract) -> Self {
        Self { contract }
    }

    /// Price the contract on `lattice`, consuming it.
    ///
    /// # Errors
    /// `DegenerateLattice` when pruning left some level without a live node.
    pub fn value(&self, lattice: Lattice) -> Result<Valuation> {
        if let Some(level) = lattice.degenerate_level() {
            return Err(Error::DegenerateLattice { level });
        }
        let (params, mut levels) = lattice.into_parts();

        let mut boundary = match self.contract.exercise_style() {
            ExerciseStyle::American => Some(ExerciseBoundary::new(
                self.contract.kind(),
                params.step_count(),
                params.dt(),
            )),
            ExerciseStyle::European => None,
        };

        let Some(mut next) = levels.pop() else {
            return Err(Error::DegenerateLattice { level: 0 });
        };
        for node in next.nodes.iter_mut().filter(|n| n.is_live()) {
            node.option_value = self.contract.payoff(node.spot_value);
        }

        let mut first_level = None;
        while let Some(mut level) = levels.pop() {
            match boundary.as_mut() {
                Some(b) => {
                    self.roll_back::<true>(&mut level, &next, &params);
                    for (_, node) in level.iter().filter(|(_, n)| n.is_exercised) {
                        b.record(level.index, node.spot_value);
                    }
                }
                None => self.roll_back::<false>(&mut level, &next, &params),
            }
            let priced = std::mem::replace(&mut next, level);
            if priced.index == 1 {
                first_level = Some(priced);
            }
        }

        let price = next.value_at(0);
        Ok(Valuation {
            price,
            exercise_boundary: boundary,
            first_level,
        })
    }

    fn roll_back<const EARLY_EXERCISE: bool>(
        &self,
        level: &mut Level,
        next: &Level,
        params: &LatticeParameters,
    ) {
        let df = params.discount_factor();
        let uniform = [params.prob_down(), params.prob_mid(), params.prob_up()];
        let Level {
            min_offset,
            nodes,
            branching,
            ..
        } = level;
        let min_offset = *min_offset;
        let branching = branching.as_ref();
        let contract = self.contract;

        let price_node = |(k, node): (usize, &mut Node)| {
            if node.pruned {
                return;
            }
            let (mid, [pd, pm, pu]) = match branching {
                Some(b) => b.branch(k),
                None => (min_offset + k as i32, uniform),
            };
            let continuation = df
                * (pu * next.value_at(mid + 1) + pm * next.value_at(mid) + pd * next.value_at(mid - 1));
            node.continuation_value = continuation;
            node.option_value = continuation;
            if EARLY_EXERCISE {
                let intrinsic = contract.payoff(node.spot_value);
                if intrinsic > continuation {
                    node.option_value = intrinsic;
                    node.is_exercised = true;
                }
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            nodes.par_iter_mut().enumerate().for_each(price_node);
        }
        #[cfg(not(feature = "parallel"))]
        nodes.iter_mut().enumerate().for_each(price_node);
    }
}
