//! Calendar dates.
//!
//! Dates are plain `chrono` calendar dates. The helpers here only translate
//! `chrono`'s `Option`-returning constructors into the crate error type.

use tri_core::errors::{Error, Result};

/// A calendar date (no time-of-day component).
pub type Date = chrono::NaiveDate;

/// Create a date from year, month (1–12) and day-of-month (1–31).
pub fn date(year: i32, month: u32, day: u32) -> Result<Date> {
    Date::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::InvalidInput(format!("{year}-{month:02}-{day:02} is not a calendar date"))
    })
}

/// Advance `d` by `n` calendar days (negative `n` moves backwards).
pub fn add_days(d: Date, n: i64) -> Result<Date> {
    d.checked_add_signed(chrono::Duration::days(n))
        .ok_or_else(|| Error::InvalidInput(format!("{d} + {n} days is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_and_invalid_dates() {
        let d = date(2024, 2, 29).unwrap();
        assert_eq!(d.to_string(), "2024-02-29");
        assert!(date(2023, 2, 29).is_err());
        assert!(date(2023, 13, 1).is_err());
    }

    #[test]
    fn day_arithmetic() {
        let d = date(2023, 1, 31).unwrap();
        assert_eq!(add_days(d, 1).unwrap(), date(2023, 2, 1).unwrap());
        assert_eq!(add_days(d, -31).unwrap(), date(2022, 12, 31).unwrap());
    }
}
