//! A single known cash dividend.

use tri_core::{DiscountFactor, Rate, Real, Time};
use tri_time::{Actual365Fixed, Date, DayCounter};

/// A cash amount paid on a known ex-dividend date.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dividend {
    /// Cash amount, in the currency of the underlying.
    pub amount: Real,
    /// Ex-dividend date.
    pub ex_date: Date,
}

impl Dividend {
    /// Create a dividend.
    pub fn new(amount: Real, ex_date: Date) -> Self {
        Self { amount, ex_date }
    }

    /// Year fraction (Actual/365 Fixed) from `trade_date` to the ex-date.
    pub fn time_from(&self, trade_date: Date) -> Time {
        Actual365Fixed.year_fraction(trade_date, self.ex_date)
    }

    /// Time of the ex-date from `trade_date` when it falls in
    /// `(0, horizon]`, else `None`.
    ///
    /// A dividend going ex on the trade date is already reflected in the
    /// spot; one after the horizon never reaches the holder.
    pub fn time_within(&self, trade_date: Date, horizon: Time) -> Option<Time> {
        let t = self.time_from(trade_date);
        (t > 0.0 && t <= horizon).then_some(t)
    }

    /// Value at time `t` of the amount paid at time `t_pay`, under a flat
    /// continuously compounded `rate`.
    ///
    /// `D · exp(-r (t_pay - t))`
    pub fn value_at(&self, rate: Rate, t_pay: Time, t: Time) -> Real {
        self.amount * discount(rate, t_pay - t)
    }

    /// Present value at the trade date.
    pub fn present_value(&self, rate: Rate, trade_date: Date) -> Real {
        self.value_at(rate, self.time_from(trade_date), 0.0)
    }
}

#[inline]
fn discount(rate: Rate, t: Time) -> DiscountFactor {
    (-rate * t).exp()
}
