//! Branching parameters of the trinomial lattice.
//!
//! The middle child of every node sits on the one-step forward of its
//! parent, and the spacing is `α = exp(σ √(3 Δt))`. Matching the first two
//! moments of the lognormal step then fixes the probabilities:
//!
//! ```text
//! var    = exp(σ² Δt) − 1
//! p_down = var / ((1 − α)(α⁻² − 1))
//! p_up   = p_down / α
//! p_mid  = 1 − p_up − p_down
//! ```
//!
//! Off the dividend crossing none of these depend on the node, so they are
//! computed once per lattice.

use tracing::debug;
use tri_core::{
    ensure, DiscountFactor, Error, Probability, Rate, Real, Result, Size, Time, Volatility,
};
use tri_market::MarketModel;
use tri_math::in_unit_interval;

/// Slack allowed when checking that a probability lies in `[0, 1]`.
pub const PROBABILITY_TOLERANCE: Real = 1e-10;

/// Per-lattice constants derived from the market, the horizon and the
/// step count.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeParameters {
    step_count: Size,
    time_to_maturity: Time,
    dt: Time,
    interest_rate: Rate,
    volatility: Volatility,
    spacing_factor: Real,
    discount_factor: DiscountFactor,
    prob_up: Probability,
    prob_mid: Probability,
    prob_down: Probability,
}

impl LatticeParameters {
    /// Derive the parameters for a `step_count`-step lattice spanning
    /// `time_to_maturity` years.
    ///
    /// # Errors
    /// `InvalidInput` for a zero step count or a non-positive horizon;
    /// `LatticeInstability` when a probability leaves `[0, 1]`.
    pub fn new(market: &MarketModel, time_to_maturity: Time, step_count: Size) -> Result<Self> {
        ensure!(step_count >= 1, "step count must be at least 1, got {step_count}");
        ensure!(
            time_to_maturity.is_finite() && time_to_maturity > 0.0,
            "time to maturity must be positive, got {time_to_maturity}"
        );

        let sigma = market.volatility();
        let r = market.interest_rate();
        let dt = time_to_maturity / step_count as Real;

        let alpha = (sigma * (3.0 * dt).sqrt()).exp();
        let var = (sigma * sigma * dt).exp_m1();
        let prob_down = var / ((1.0 - alpha) * (alpha.powi(-2) - 1.0));
        let prob_up = prob_down / alpha;
        let prob_mid = 1.0 - prob_up - prob_down;

        let stable = [prob_up, prob_mid, prob_down]
            .iter()
            .all(|&p| p.is_finite() && in_unit_interval(p, PROBABILITY_TOLERANCE));
        if !stable {
            return Err(Error::LatticeInstability {
                p_up: prob_up,
                p_mid: prob_mid,
                p_down: prob_down,
                dt,
                volatility: sigma,
                step_count,
            });
        }

        debug!(
            step_count,
            dt,
            spacing_factor = alpha,
            prob_up,
            prob_mid,
            prob_down,
            "lattice parameters"
        );

        Ok(Self {
            step_count,
            time_to_maturity,
            dt,
            interest_rate: r,
            volatility: sigma,
            spacing_factor: alpha,
            discount_factor: (-r * dt).exp(),
            prob_up,
            prob_mid,
            prob_down,
        })
    }

    /// Number of time steps `n`.
    pub fn step_count(&self) -> Size {
        self.step_count
    }

    /// Horizon `T` in years.
    pub fn time_to_maturity(&self) -> Time {
        self.time_to_maturity
    }

    /// Step size `Δt = T / n`.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Time of level `i`.
    #[inline]
    pub fn time(&self, level: Size) -> Time {
        level as Real * self.dt
    }

    /// Continuously compounded rate used for drift and discounting.
    pub fn interest_rate(&self) -> Rate {
        self.interest_rate
    }

    /// Volatility the lattice was built for.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Spot ratio `α` between adjacent nodes of a level.
    pub fn spacing_factor(&self) -> Real {
        self.spacing_factor
    }

    /// One-step discount factor `exp(−r Δt)`.
    pub fn discount_factor(&self) -> DiscountFactor {
        self.discount_factor
    }

    /// Probability of the up branch.
    pub fn prob_up(&self) -> Probability {
        self.prob_up
    }

    /// Probability of the middle branch.
    pub fn prob_mid(&self) -> Probability {
        self.prob_mid
    }

    /// Probability of the down branch.
    pub fn prob_down(&self) -> Probability {
        self.prob_down
    }
}
