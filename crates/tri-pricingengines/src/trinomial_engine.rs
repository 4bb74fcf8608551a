//! Trinomial lattice pricing engine.
//!
//! Runs the full pipeline for one contract: parameters, lattice growth,
//! backward induction. Every call owns its lattice; nothing is cached
//! between calls.

use crate::pricer_parameters::PricerParameters;
use tracing::debug_span;
use tri_core::{Price, Real, Result, Size};
use tri_instruments::{OptionContract, Payoff, PricingEngine, PricingResults};
use tri_market::MarketModel;
use tri_methods::{
    ExerciseBoundary, LatticeBuilder, LatticeParameters, Level, NodeStatistics, Valuator,
};

/// Output of [`TrinomialEngine::price`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrinomialResults {
    /// Value at the root.
    pub price: Price,
    /// Early-exercise boundary (American contracts only).
    pub exercise_boundary: Option<ExerciseBoundary>,
    /// Node counts of the lattice.
    pub statistics: NodeStatistics,
    /// Level at which the dividend was paid, if one fell inside the horizon.
    pub dividend_level: Option<Size>,
    /// Branching parameters used.
    pub lattice_parameters: LatticeParameters,
    /// Priced level-1 nodes.
    pub first_level: Option<Level>,
}

/// Prices vanilla contracts on a recombining trinomial lattice.
#[derive(Debug, Clone, Copy)]
pub struct TrinomialEngine {
    params: PricerParameters,
}

impl TrinomialEngine {
    /// An engine for the given run configuration.
    pub fn new(params: PricerParameters) -> Self {
        Self { params }
    }

    /// Run configuration.
    pub fn parameters(&self) -> &PricerParameters {
        &self.params
    }

    /// Price `contract` under `market`.
    ///
    /// # Errors
    /// `InvalidInput` for bad run parameters or inputs the lattice cannot
    /// represent, `LatticeInstability` when the step count is too small for
    /// the volatility, `DegenerateLattice` when pruning empties a level.
    pub fn price(&self, market: &MarketModel, contract: &OptionContract) -> Result<TrinomialResults> {
        self.params.validate()?;
        let _span = debug_span!(
            "trinomial_pricing",
            payoff = %contract.vanilla_payoff().description(),
            exercise = %contract.exercise_style(),
            steps = self.params.step_count,
        )
        .entered();
        let t = contract.time_to_maturity(self.params.trade_date)?;
        let lattice_parameters = LatticeParameters::new(market, t, self.params.step_count)?;
        let lattice = LatticeBuilder::new(&lattice_parameters, market, self.params.trade_date)
            .pruning(self.params.pruning)
            .build()?;
        let statistics = lattice.statistics();
        let dividend_level = lattice.dividend_level();

        let valuation = Valuator::new(contract).value(lattice)?;
        Ok(TrinomialResults {
            price: valuation.price,
            exercise_boundary: valuation.exercise_boundary,
            statistics,
            dividend_level,
            lattice_parameters,
            first_level: valuation.first_level,
        })
    }
}

impl PricingEngine for TrinomialEngine {
    fn calculate(&self, market: &MarketModel, contract: &OptionContract) -> Result<PricingResults> {
        let r = self.price(market, contract)?;
        let mut results = PricingResults::from_npv(r.price)
            .with_result("total_nodes", r.statistics.total_nodes as Real)
            .with_result("live_nodes", r.statistics.live_nodes as Real);
        if let Some(k) = r.dividend_level {
            results = results.with_result("dividend_level", k as Real);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tri_core::Error;
    use tri_instruments::{ExerciseStyle, OptionType};
    use tri_time::date;

    fn setup() -> (MarketModel, OptionContract, PricerParameters) {
        let market = MarketModel::without_dividend(0.04, 0.25, 100.0).unwrap();
        let contract = OptionContract::new(
            OptionType::Call,
            ExerciseStyle::European,
            105.0,
            date(2026, 1, 1).unwrap(),
        )
        .unwrap();
        (market, contract, PricerParameters::new(date(2025, 1, 1).unwrap(), 100))
    }

    #[test]
    fn prices_and_reports_statistics() {
        let (market, contract, params) = setup();
        let r = TrinomialEngine::new(params).price(&market, &contract).unwrap();
        assert!((r.price - 9.556).abs() < 0.1, "price = {}", r.price);
        assert_eq!(r.statistics.total_nodes, 101 * 101);
        assert_eq!(r.dividend_level, None);
        assert_eq!(r.lattice_parameters.step_count(), 100);
        assert!(r.exercise_boundary.is_none());
    }

    #[test]
    fn step_ceiling_is_enforced() {
        let (market, contract, params) = setup();
        let engine = TrinomialEngine::new(params.with_step_ceiling(50));
        assert!(matches!(
            engine.price(&market, &contract),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn expired_contract_is_rejected() {
        let (market, contract, params) = setup();
        let engine = TrinomialEngine::new(params.with_trade_date(date(2026, 1, 1).unwrap()));
        assert!(engine.price(&market, &contract).is_err());
    }

    #[test]
    fn engine_interface() {
        let (market, contract, params) = setup();
        let engine = TrinomialEngine::new(params);
        let res = PricingEngine::calculate(&engine, &market, &contract).unwrap();
        assert_eq!(res.result("total_nodes"), Some((101 * 101) as Real));
        assert_eq!(res.npv, engine.npv(&market, &contract).unwrap());
    }
}
