//! # tri-math
//!
//! Mathematical utilities: the standard normal distribution (via statrs) and
//! floating-point comparison helpers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Floating-point comparison utilities.
pub mod comparison;

/// Standard normal distribution.
pub mod distributions;

pub use comparison::in_unit_interval;
pub use distributions::{normal_cdf, normal_pdf};
