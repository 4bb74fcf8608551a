//! # tri-time
//!
//! Calendar dates and the day-count convention used to turn them into year
//! fractions.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Date` type and checked constructors.
pub mod date;

/// `DayCounter` trait and the Actual/365 (Fixed) convention.
pub mod day_counter;

pub use date::{add_days, date, Date};
pub use day_counter::{Actual365Fixed, DayCounter};
