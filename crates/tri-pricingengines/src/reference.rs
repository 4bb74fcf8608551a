//! Black-Scholes reference pricer with an escrowed cash dividend.
//!
//! European options only. A dividend paid inside the option's life is
//! present-valued to the trade date and subtracted from the spot; the
//! closed form is then applied to that adjusted spot.

use tri_core::{ensure, Rate, Real, Result, Time, Volatility};
use tri_instruments::{
    ExerciseStyle, OptionContract, OptionType, PricingEngine, PricingResults,
};
use tri_market::MarketModel;
use tri_math::{normal_cdf, normal_pdf};
use tri_time::Date;

/// Closed-form price and sensitivities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceResults {
    /// Option value.
    pub price: Real,
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂σ, per 1.0 absolute vol.
    pub vega: Real,
    /// ∂V/∂t, per year.
    pub theta: Real,
    /// ∂V/∂r, per 1.0 rate shift.
    pub rho: Real,
    /// ∂²V/∂S∂σ.
    pub vanna: Real,
    /// ∂²V/∂σ².
    pub vomma: Real,
    /// ∂Δ/∂t, per year.
    pub charm: Real,
    /// ∂³V/∂S³.
    pub speed: Real,
    /// ∂Γ/∂σ.
    pub zomma: Real,
    /// `S Δ / V`; zero when the option is worthless.
    pub elasticity: Real,
}

/// Black-Scholes price and Greeks for a European option on a
/// non-dividend-paying underlying.
///
/// `C = S N(d₁) − K e^{−rT} N(d₂)`, `P = K e^{−rT} N(−d₂) − S N(−d₁)`,
/// with `d₁,₂ = (ln(S/K) + (r ± σ²/2)T) / (σ√T)`.
pub fn black_scholes(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    rate: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
) -> ReferenceResults {
    let phi = option_type.sign();
    let t = time_to_expiry;
    let sqrt_t = t.sqrt();
    let std_dev = volatility * sqrt_t;
    let df = (-rate * t).exp();

    let d1 = ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * t) / std_dev;
    let d2 = d1 - std_dev;

    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    let price = phi * (spot * nd1 - strike * df * nd2);
    let delta = phi * nd1;
    let gamma = npd1 / (spot * std_dev);
    let vega = spot * npd1 * sqrt_t;

    ReferenceResults {
        price,
        delta,
        gamma,
        vega,
        theta: -(spot * npd1 * volatility) / (2.0 * sqrt_t) - phi * rate * strike * df * nd2,
        rho: phi * strike * t * df * nd2,
        vanna: -npd1 * d2 / volatility,
        vomma: vega * d1 * d2 / volatility,
        charm: -npd1 * (2.0 * rate * t - d2 * std_dev) / (2.0 * t * std_dev),
        speed: -gamma / spot * (d1 / std_dev + 1.0),
        zomma: gamma * (d1 * d2 - 1.0) / volatility,
        elasticity: if price > 0.0 { spot * delta / price } else { 0.0 },
    }
}

/// Analytic benchmark for the lattice engine.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePricer {
    trade_date: Date,
}

impl ReferencePricer {
    /// A pricer valuing as of `trade_date`.
    pub fn new(trade_date: Date) -> Self {
        Self { trade_date }
    }

    /// Spot net of the present value of a dividend going ex in
    /// `(trade date, maturity]`, the same window the lattice uses.
    pub fn adjusted_spot(&self, market: &MarketModel, time_to_maturity: Time) -> Real {
        let spot = market.spot_price();
        market
            .dividend()
            .filter(|d| d.time_within(self.trade_date, time_to_maturity).is_some())
            .map_or(spot, |d| {
                spot - d.present_value(market.interest_rate(), self.trade_date)
            })
    }

    /// Price and Greeks of a European `contract`.
    ///
    /// # Errors
    /// `InvalidInput` for American contracts, a maturity not after the trade
    /// date, or a dividend worth at least the spot.
    pub fn calculate(
        &self,
        market: &MarketModel,
        contract: &OptionContract,
    ) -> Result<ReferenceResults> {
        ensure!(
            contract.exercise_style() == ExerciseStyle::European,
            "the closed-form pricer only values European contracts"
        );
        let t = contract.time_to_maturity(self.trade_date)?;
        let spot = self.adjusted_spot(market, t);
        ensure!(
            spot > 0.0,
            "spot net of dividend must be positive, got {spot}"
        );
        Ok(black_scholes(
            contract.kind(),
            spot,
            contract.strike_price(),
            market.interest_rate(),
            market.volatility(),
            t,
        ))
    }
}

impl PricingEngine for ReferencePricer {
    fn calculate(&self, market: &MarketModel, contract: &OptionContract) -> Result<PricingResults> {
        let r = ReferencePricer::calculate(self, market, contract)?;
        Ok(PricingResults::from_npv(r.price)
            .with_result("delta", r.delta)
            .with_result("gamma", r.gamma)
            .with_result("vega", r.vega)
            .with_result("theta", r.theta)
            .with_result("rho", r.rho)
            .with_result("vanna", r.vanna)
            .with_result("vomma", r.vomma)
            .with_result("charm", r.charm)
            .with_result("speed", r.speed)
            .with_result("zomma", r.zomma)
            .with_result("elasticity", r.elasticity))
    }
}
