//! Lattice convergence diagnostics.
//!
//! [`convergence_profile`] compares lattice prices against the closed form
//! over a range of step counts. [`GapEstimate`] gives the theoretical price
//! gap of an `n`-step lattice and inverts it to a step count.

use crate::pricer_parameters::PricerParameters;
use crate::reference::ReferencePricer;
use crate::trinomial_engine::TrinomialEngine;
use std::f64::consts::PI;
use tri_core::{ensure, Price, Real, Result, Size, Time};
use tri_instruments::OptionContract;
use tri_market::MarketModel;

/// One row of a convergence profile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergencePoint {
    /// Lattice steps.
    pub step_count: Size,
    /// Lattice price.
    pub lattice_price: Price,
    /// Closed-form price.
    pub reference_price: Price,
    /// `lattice_price − reference_price`.
    pub error: Real,
}

/// Lattice price against the closed form for each step count in `steps`.
///
/// European contracts only; the other run parameters come from `params`.
pub fn convergence_profile(
    market: &MarketModel,
    contract: &OptionContract,
    params: &PricerParameters,
    steps: &[Size],
) -> Result<Vec<ConvergencePoint>> {
    let reference_price = ReferencePricer::new(params.trade_date)
        .calculate(market, contract)?
        .price;
    steps
        .iter()
        .map(|&n| {
            let lattice_price = TrinomialEngine::new(params.with_step_count(n))
                .price(market, contract)?
                .price;
            Ok(ConvergencePoint {
                step_count: n,
                lattice_price,
                reference_price,
                error: lattice_price - reference_price,
            })
        })
        .collect()
}

/// Theoretical accuracy of an `n`-step lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GapEstimate {
    /// Standard deviation of the terminal spot,
    /// `S₀ e^{rT} √(e^{σ²T} − 1)`.
    pub terminal_std_dev: Real,
    /// Price gap, `3S₀/(8√(2π)) · (e^{σ²Δt} − 1) e^{2rΔt} / √(e^{σ²T} − 1)`.
    pub gap: Real,
}

impl GapEstimate {
    /// Estimate for `step_count` steps over `time_to_maturity` years.
    pub fn new(market: &MarketModel, time_to_maturity: Time, step_count: Size) -> Result<Self> {
        ensure!(step_count >= 1, "step count must be at least 1, got {step_count}");
        ensure!(
            time_to_maturity > 0.0,
            "time to maturity must be positive, got {time_to_maturity}"
        );
        let (s0, r, var) = terms(market, time_to_maturity);
        let dt = time_to_maturity / step_count as Real;
        let sigma2 = market.volatility().powi(2);
        Ok(Self {
            terminal_std_dev: s0 * (r * time_to_maturity).exp() * var.sqrt(),
            gap: 3.0 * s0 / (8.0 * (2.0 * PI).sqrt()) * (sigma2 * dt).exp_m1()
                * (2.0 * r * dt).exp()
                / var.sqrt(),
        })
    }

    /// Step count whose gap is about `gap`, ignoring the rate term.
    ///
    /// `n = round(σ²T / ln(1 + 8√(2π) · gap · √(e^{σ²T} − 1) / (3S₀)))`,
    /// never less than one.
    pub fn steps_for_gap(market: &MarketModel, time_to_maturity: Time, gap: Real) -> Result<Size> {
        ensure!(gap.is_finite() && gap > 0.0, "gap must be positive, got {gap}");
        ensure!(
            time_to_maturity > 0.0,
            "time to maturity must be positive, got {time_to_maturity}"
        );
        let (s0, _, var) = terms(market, time_to_maturity);
        let sigma2 = market.volatility().powi(2);
        let denom = (8.0 * (2.0 * PI).sqrt() * gap * var.sqrt() / (3.0 * s0)).ln_1p();
        Ok(((sigma2 * time_to_maturity / denom).round() as Size).max(1))
    }
}

/// `(S₀, r, e^{σ²T} − 1)`
fn terms(market: &MarketModel, t: Time) -> (Real, Real, Real) {
    let sigma2 = market.volatility().powi(2);
    (
        market.spot_price(),
        market.interest_rate(),
        (sigma2 * t).exp_m1(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gap_shrinks_with_steps() {
        let market = MarketModel::without_dividend(0.04, 0.25, 100.0).unwrap();
        let g100 = GapEstimate::new(&market, 1.0, 100).unwrap();
        let g400 = GapEstimate::new(&market, 1.0, 400).unwrap();
        assert!(g400.gap < g100.gap);
        assert_relative_eq!(g100.gap / g400.gap, 4.0, max_relative = 0.01);
        assert_relative_eq!(
            g100.terminal_std_dev,
            100.0 * 0.04_f64.exp() * 0.0625_f64.exp_m1().sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn steps_for_gap_inverts_gap() {
        let market = MarketModel::without_dividend(0.0, 0.3, 50.0).unwrap();
        for n in [25, 100, 365, 1000] {
            let g = GapEstimate::new(&market, 2.0, n).unwrap();
            assert_eq!(GapEstimate::steps_for_gap(&market, 2.0, g.gap).unwrap(), n);
        }
        assert!(GapEstimate::steps_for_gap(&market, 2.0, 0.0).is_err());
        assert_eq!(GapEstimate::steps_for_gap(&market, 2.0, 1e6).unwrap(), 1);
    }
}
