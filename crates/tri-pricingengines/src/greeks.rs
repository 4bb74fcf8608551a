//! Option sensitivities.
//!
//! Two ways to get Delta and Gamma:
//!
//! * **Finite differences**: re-run the whole pipeline on bumped markets.
//!   Central differences in spot with `h = SPOT_BUMP · S`.
//! * **Tree-based**: read the three priced level-1 nodes around the trunk.
//!   Needs no extra lattice for Delta and Gamma but fails when pruning
//!   removed one of those nodes.
//!
//! Vega always costs one forward-bumped re-pricing. Theta, Rho and dividend
//! Rho are separate calls, each a small number of re-pricings.
//!
//! The second- and third-order sensitivities (Vanna, Vomma, Charm, Speed,
//! Zomma) and the elasticity are bump-and-reprice too, built from the same
//! spot ladder as finite-difference Delta and Gamma. Speed and Zomma
//! difference a lattice Gamma, so they are only as smooth as the spot grid
//! around the strike.

use crate::pricer_parameters::PricerParameters;
use crate::trinomial_engine::TrinomialEngine;
use tracing::{trace_span, warn};
use tri_core::{Error, Price, Real, Result};
use tri_instruments::OptionContract;
use tri_market::MarketModel;
use tri_methods::Level;
use tri_time::add_days;

/// Relative spot bump for finite-difference Delta and Gamma.
pub const SPOT_BUMP: Real = 0.01;
/// Relative volatility bump for Vega.
pub const VOLATILITY_BUMP: Real = 0.01;
/// Absolute rate bump for Rho.
pub const RATE_BUMP: Real = 1e-4;
/// Absolute cash bump for dividend Rho.
pub const DIVIDEND_BUMP: Real = 0.01;
/// Calendar days the trade date rolls for Theta and Charm.
pub const TIME_BUMP_DAYS: i64 = 1;

/// How Delta and Gamma are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GreeksMode {
    /// Central differences over re-priced lattices.
    #[default]
    FiniteDifference,
    /// Differences across the priced level-1 nodes.
    TreeBased,
}

/// Price and first-order sensitivities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// Unbumped lattice price.
    pub price: Price,
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂σ, per 1.0 absolute vol.
    pub vega: Real,
    /// Mode actually used; differs from the request after a fallback.
    pub mode: GreeksMode,
}

/// Computes sensitivities with a [`TrinomialEngine`].
#[derive(Debug, Clone, Copy)]
pub struct GreeksEngine {
    engine: TrinomialEngine,
    fallback: bool,
}

impl GreeksEngine {
    /// An engine that falls back from tree-based to finite-difference
    /// Greeks when the lattice is too shallow.
    pub fn new(params: PricerParameters) -> Self {
        Self {
            engine: TrinomialEngine::new(params),
            fallback: true,
        }
    }

    /// Enable or disable the fallback to finite differences.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Price, Delta, Gamma and Vega in the requested mode.
    ///
    /// # Errors
    /// Any pricing error; `InsufficientLatticeDepth` only when tree-based
    /// Greeks were requested with the fallback disabled.
    pub fn compute(
        &self,
        market: &MarketModel,
        contract: &OptionContract,
        mode: GreeksMode,
    ) -> Result<Greeks> {
        match mode {
            GreeksMode::FiniteDifference => self.finite_difference(market, contract),
            GreeksMode::TreeBased => match self.tree_based(market, contract) {
                Err(e) if e.is_recoverable() && self.fallback => {
                    warn!(error = %e, "tree-based Greeks unavailable, using finite differences");
                    self.finite_difference(market, contract)
                }
                other => other,
            },
        }
    }

    /// Delta and Gamma from central differences in spot.
    pub fn finite_difference(&self, market: &MarketModel, contract: &OptionContract) -> Result<Greeks> {
        let (price, delta, gamma) = self.spot_ladder(market, contract)?;
        Ok(Greeks {
            price,
            delta,
            gamma,
            vega: self.vega(market, contract, price)?,
            mode: GreeksMode::FiniteDifference,
        })
    }

    /// Delta and Gamma from the priced level-1 nodes.
    ///
    /// # Errors
    /// `InsufficientLatticeDepth` when the node at offset −1, 0 or +1 is
    /// pruned or absent.
    pub fn tree_based(&self, market: &MarketModel, contract: &OptionContract) -> Result<Greeks> {
        let results = self.engine.price(market, contract)?;
        let level = results
            .first_level
            .as_ref()
            .ok_or(Error::InsufficientLatticeDepth { offset: 0 })?;
        let (sd, vd) = trunk_neighbour(level, -1)?;
        let (sm, vm) = trunk_neighbour(level, 0)?;
        let (su, vu) = trunk_neighbour(level, 1)?;

        let delta = (vu - vd) / (su - sd);
        let gamma = ((vu - vm) / (su - sm) - (vm - vd) / (sm - sd)) / (0.5 * (su - sd));
        Ok(Greeks {
            price: results.price,
            delta,
            gamma,
            vega: self.vega(market, contract, results.price)?,
            mode: GreeksMode::TreeBased,
        })
    }

    /// Change in price when the trade date rolls forward one calendar day,
    /// with everything else held fixed.
    pub fn theta(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let price = self.price(market, contract)?;
        let _span = trace_span!("bumped_pricing", sensitivity = "time").entered();
        let later = self.rolled()?.price(market, contract)?;
        Ok(later - price)
    }

    /// ∂²V/∂S∂σ from the four-corner stencil with `h_S = SPOT_BUMP · S`
    /// and `h_σ = VOLATILITY_BUMP · σ`.
    pub fn vanna(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let s = market.spot_price();
        let sigma = market.volatility();
        let hs = SPOT_BUMP * s;
        let hv = VOLATILITY_BUMP * sigma;
        let _span = trace_span!("bumped_pricing", sensitivity = "spot_volatility").entered();
        let corner = |ds: Real, dv: Real| -> Result<Price> {
            self.price(&market.with_spot(s + ds)?.with_volatility(sigma + dv)?, contract)
        };
        let uu = corner(hs, hv)?;
        let ud = corner(hs, -hv)?;
        let du = corner(-hs, hv)?;
        let dd = corner(-hs, -hv)?;
        Ok((uu - ud - du + dd) / (4.0 * hs * hv))
    }

    /// ∂²V/∂σ² by central difference with `h = VOLATILITY_BUMP · σ`.
    pub fn vomma(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let sigma = market.volatility();
        let h = VOLATILITY_BUMP * sigma;
        let price = self.price(market, contract)?;
        let _span = trace_span!("bumped_pricing", sensitivity = "volatility").entered();
        let up = self.price(&market.with_volatility(sigma + h)?, contract)?;
        let down = self.price(&market.with_volatility(sigma - h)?, contract)?;
        Ok((up - 2.0 * price + down) / (h * h))
    }

    /// Change in finite-difference Delta when the trade date rolls forward
    /// one calendar day.
    pub fn charm(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let (_, delta, _) = self.spot_ladder(market, contract)?;
        let _span = trace_span!("bumped_pricing", sensitivity = "time").entered();
        let (_, later, _) = self.rolled()?.spot_ladder(market, contract)?;
        Ok(later - delta)
    }

    /// ∂Γ/∂S, central difference of ladder Gammas at `S ± SPOT_BUMP · S`.
    pub fn speed(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let s = market.spot_price();
        let h = SPOT_BUMP * s;
        let _span = trace_span!("bumped_pricing", sensitivity = "spot").entered();
        let (_, _, up) = self.spot_ladder(&market.with_spot(s + h)?, contract)?;
        let (_, _, down) = self.spot_ladder(&market.with_spot(s - h)?, contract)?;
        Ok((up - down) / (2.0 * h))
    }

    /// ∂Γ/∂σ, central difference of ladder Gammas at `σ ± VOLATILITY_BUMP · σ`.
    pub fn zomma(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let sigma = market.volatility();
        let h = VOLATILITY_BUMP * sigma;
        let _span = trace_span!("bumped_pricing", sensitivity = "volatility").entered();
        let (_, _, up) = self.spot_ladder(&market.with_volatility(sigma + h)?, contract)?;
        let (_, _, down) = self.spot_ladder(&market.with_volatility(sigma - h)?, contract)?;
        Ok((up - down) / (2.0 * h))
    }

    /// Lambda, `Δ · S / V`. Zero for a worthless option.
    pub fn elasticity(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let (price, delta, _) = self.spot_ladder(market, contract)?;
        if price == 0.0 {
            return Ok(0.0);
        }
        Ok(delta * market.spot_price() / price)
    }

    /// Price with central Delta and Gamma at `h = SPOT_BUMP · S`.
    fn spot_ladder(&self, market: &MarketModel, contract: &OptionContract) -> Result<(Price, Real, Real)> {
        let price = self.price(market, contract)?;
        let s = market.spot_price();
        let h = SPOT_BUMP * s;
        let _span = trace_span!("bumped_pricing", sensitivity = "spot").entered();
        let up = self.price(&market.with_spot(s + h)?, contract)?;
        let down = self.price(&market.with_spot(s - h)?, contract)?;
        Ok((price, (up - down) / (2.0 * h), (up - 2.0 * price + down) / (h * h)))
    }

    fn rolled(&self) -> Result<Self> {
        let params = *self.engine.parameters();
        let trade_date = add_days(params.trade_date, TIME_BUMP_DAYS)?;
        Ok(Self {
            engine: TrinomialEngine::new(params.with_trade_date(trade_date)),
            fallback: self.fallback,
        })
    }

    /// ∂V/∂r by central difference with `h = RATE_BUMP`.
    pub fn rho(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let r = market.interest_rate();
        let _span = trace_span!("bumped_pricing", sensitivity = "rate").entered();
        let up = self.price(&market.with_interest_rate(r + RATE_BUMP)?, contract)?;
        let down = self.price(&market.with_interest_rate(r - RATE_BUMP)?, contract)?;
        Ok((up - down) / (2.0 * RATE_BUMP))
    }

    /// ∂V/∂D by central difference with `h = DIVIDEND_BUMP`; the lower leg
    /// is floored at a zero dividend.
    pub fn dividend_rho(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        let d = market.dividend_amount();
        let lower = (d - DIVIDEND_BUMP).max(0.0);
        let upper = d + DIVIDEND_BUMP;
        let _span = trace_span!("bumped_pricing", sensitivity = "dividend").entered();
        let up = self.price(&market.with_dividend_amount(upper)?, contract)?;
        let down = self.price(&market.with_dividend_amount(lower)?, contract)?;
        Ok((up - down) / (upper - lower))
    }

    fn vega(&self, market: &MarketModel, contract: &OptionContract, price: Price) -> Result<Real> {
        let sigma = market.volatility();
        let h = VOLATILITY_BUMP * sigma;
        let _span = trace_span!("bumped_pricing", sensitivity = "volatility").entered();
        let bumped = self.price(&market.with_volatility(sigma + h)?, contract)?;
        Ok((bumped - price) / h)
    }

    fn price(&self, market: &MarketModel, contract: &OptionContract) -> Result<Price> {
        Ok(self.engine.price(market, contract)?.price)
    }
}

fn trunk_neighbour(level: &Level, offset: i32) -> Result<(Real, Price)> {
    level
        .live_node(offset)
        .map(|n| (n.spot_value, n.option_value))
        .ok_or(Error::InsufficientLatticeDepth { offset })
}
