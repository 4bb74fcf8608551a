//! Vanilla option contract.

use crate::exercise::ExerciseStyle;
use crate::payoff::{OptionType, Payoff, PlainVanillaPayoff};
use tri_core::{ensure, Real, Result, Time};
use tri_time::{Actual365Fixed, Date, DayCounter};

/// A plain vanilla call or put on a single underlying.
///
/// Immutable once built; use [`OptionContract::with_exercise_style`] to get
/// the same contract with the other exercise right.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    payoff: PlainVanillaPayoff,
    exercise_style: ExerciseStyle,
    maturity_date: Date,
}

impl OptionContract {
    /// Create a contract. The strike must be finite and positive.
    pub fn new(
        kind: OptionType,
        exercise_style: ExerciseStyle,
        strike_price: Real,
        maturity_date: Date,
    ) -> Result<Self> {
        ensure!(
            strike_price.is_finite() && strike_price > 0.0,
            "strike price must be positive, got {strike_price}"
        );
        Ok(Self {
            payoff: PlainVanillaPayoff::new(kind, strike_price),
            exercise_style,
            maturity_date,
        })
    }

    /// Call or put.
    pub fn kind(&self) -> OptionType {
        self.payoff.option_type
    }

    /// European or American.
    pub fn exercise_style(&self) -> ExerciseStyle {
        self.exercise_style
    }

    /// Strike price.
    pub fn strike_price(&self) -> Real {
        self.payoff.strike
    }

    /// Maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// The vanilla payoff.
    pub fn vanilla_payoff(&self) -> &PlainVanillaPayoff {
        &self.payoff
    }

    /// Exercise value at `spot`.
    #[inline]
    pub fn payoff(&self, spot: Real) -> Real {
        self.payoff.value(spot)
    }

    /// Year fraction (Actual/365 Fixed) from `trade_date` to maturity.
    ///
    /// Fails when the contract does not mature strictly after the trade
    /// date.
    pub fn time_to_maturity(&self, trade_date: Date) -> Result<Time> {
        ensure!(
            self.maturity_date > trade_date,
            "maturity {} must be after trade date {}",
            self.maturity_date,
            trade_date
        );
        Ok(Actual365Fixed.year_fraction(trade_date, self.maturity_date))
    }

    /// Same contract with a different exercise style.
    pub fn with_exercise_style(&self, exercise_style: ExerciseStyle) -> Self {
        Self {
            exercise_style,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tri_core::Error;
    use tri_time::date;

    fn call() -> OptionContract {
        OptionContract::new(
            OptionType::Call,
            ExerciseStyle::European,
            105.0,
            date(2026, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn payoff_and_accessors() {
        let c = call();
        assert_eq!(c.kind(), OptionType::Call);
        assert_eq!(c.strike_price(), 105.0);
        assert_abs_diff_eq!(c.payoff(110.0), 5.0, epsilon = 1e-15);
        assert_abs_diff_eq!(c.payoff(100.0), 0.0, epsilon = 1e-15);
        assert_eq!(c.vanilla_payoff().description(), "Vanilla Call @ 105");
        assert_eq!(c.exercise_style().to_string(), "European");
    }

    #[test]
    fn rejects_non_positive_strike() {
        let m = date(2026, 1, 1).unwrap();
        assert!(matches!(
            OptionContract::new(OptionType::Put, ExerciseStyle::American, 0.0, m),
            Err(Error::InvalidInput(_))
        ));
        assert!(OptionContract::new(OptionType::Put, ExerciseStyle::American, f64::NAN, m).is_err());
    }

    #[test]
    fn maturity_must_follow_trade_date() {
        let c = call();
        assert_abs_diff_eq!(
            c.time_to_maturity(date(2025, 1, 1).unwrap()).unwrap(),
            1.0,
            epsilon = 1e-15
        );
        assert!(c.time_to_maturity(date(2026, 1, 1).unwrap()).is_err());
        assert!(c.time_to_maturity(date(2026, 6, 1).unwrap()).is_err());
    }

    #[test]
    fn switch_exercise_style() {
        let american = call().with_exercise_style(ExerciseStyle::American);
        assert_eq!(american.exercise_style(), ExerciseStyle::American);
        assert_eq!(american.strike_price(), 105.0);
        assert!(american.exercise_style().allows_early_exercise());
    }
}
