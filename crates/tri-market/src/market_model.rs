//! Flat Black-Scholes market with one optional cash dividend.
//!
//! `dS/S = r dt + σ dW` between dividend dates, with the spot dropping by the
//! dividend amount on the ex-date.

use crate::dividend::Dividend;
use tri_core::{ensure, Rate, Real, Result, Volatility};
use tri_time::Date;

/// Immutable market snapshot: rate, volatility, spot and dividend.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketModel {
    interest_rate: Rate,
    volatility: Volatility,
    spot_price: Real,
    dividend_amount: Real,
    dividend_date: Option<Date>,
}

impl MarketModel {
    /// Build a validated market.
    ///
    /// Fails with `InvalidInput` when any value is not finite, when the
    /// volatility or spot is not strictly positive, or when the dividend is
    /// negative.
    pub fn new(
        interest_rate: Rate,
        volatility: Volatility,
        spot_price: Real,
        dividend_amount: Real,
        dividend_date: Option<Date>,
    ) -> Result<Self> {
        ensure!(
            interest_rate.is_finite(),
            "interest rate must be finite, got {interest_rate}"
        );
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be positive, got {volatility}"
        );
        ensure!(
            spot_price.is_finite() && spot_price > 0.0,
            "spot price must be positive, got {spot_price}"
        );
        ensure!(
            dividend_amount.is_finite() && dividend_amount >= 0.0,
            "dividend amount must be non-negative, got {dividend_amount}"
        );
        Ok(Self {
            interest_rate,
            volatility,
            spot_price,
            dividend_amount,
            dividend_date,
        })
    }

    /// A market without dividends.
    pub fn without_dividend(
        interest_rate: Rate,
        volatility: Volatility,
        spot_price: Real,
    ) -> Result<Self> {
        Self::new(interest_rate, volatility, spot_price, 0.0, None)
    }

    /// Continuously compounded risk-free rate.
    pub fn interest_rate(&self) -> Rate {
        self.interest_rate
    }

    /// Annualised volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Spot price of the underlying.
    pub fn spot_price(&self) -> Real {
        self.spot_price
    }

    /// Cash dividend amount (zero when none).
    pub fn dividend_amount(&self) -> Real {
        self.dividend_amount
    }

    /// Ex-dividend date, if any.
    pub fn dividend_date(&self) -> Option<Date> {
        self.dividend_date
    }

    /// The dividend, or `None` when the amount is zero or no date is set.
    pub fn dividend(&self) -> Option<Dividend> {
        match self.dividend_date {
            Some(ex_date) if self.dividend_amount > 0.0 => {
                Some(Dividend::new(self.dividend_amount, ex_date))
            }
            _ => None,
        }
    }

    // ── Perturbed copies ─────────────────────────────────────────────────

    /// Same market with a different spot.
    pub fn with_spot(&self, spot_price: Real) -> Result<Self> {
        Self::new(
            self.interest_rate,
            self.volatility,
            spot_price,
            self.dividend_amount,
            self.dividend_date,
        )
    }

    /// Same market with a different volatility.
    pub fn with_volatility(&self, volatility: Volatility) -> Result<Self> {
        Self::new(
            self.interest_rate,
            volatility,
            self.spot_price,
            self.dividend_amount,
            self.dividend_date,
        )
    }

    /// Same market with a different rate.
    pub fn with_interest_rate(&self, interest_rate: Rate) -> Result<Self> {
        Self::new(
            interest_rate,
            self.volatility,
            self.spot_price,
            self.dividend_amount,
            self.dividend_date,
        )
    }

    /// Same market with a different dividend amount (same date).
    pub fn with_dividend_amount(&self, dividend_amount: Real) -> Result<Self> {
        Self::new(
            self.interest_rate,
            self.volatility,
            self.spot_price,
            dividend_amount,
            self.dividend_date,
        )
    }
}
