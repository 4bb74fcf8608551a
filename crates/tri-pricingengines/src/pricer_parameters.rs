//! Run configuration for one pricing call.

use tri_core::{ensure, Result, Size};
use tri_methods::PruningPolicy;
use tri_time::Date;

/// Trade date, lattice size and pruning for a pricing call.
///
/// # Example
/// ```
/// use tri_methods::PruningPolicy;
/// use tri_pricingengines::PricerParameters;
/// use tri_time::date;
///
/// let params = PricerParameters::new(date(2025, 1, 1).unwrap(), 500)
///     .with_pruning(PruningPolicy::ByProbability(1e-9))
///     .with_step_ceiling(2_000);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricerParameters {
    /// Valuation date; year fractions are measured from here.
    pub trade_date: Date,
    /// Number of lattice steps to maturity.
    pub step_count: Size,
    /// Pruning applied while the lattice grows.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pruning: PruningPolicy,
    /// Largest step count accepted, if capped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub step_ceiling: Option<Size>,
}

impl PricerParameters {
    /// Parameters without pruning or step ceiling.
    pub fn new(trade_date: Date, step_count: Size) -> Self {
        Self {
            trade_date,
            step_count,
            pruning: PruningPolicy::None,
            step_ceiling: None,
        }
    }

    /// Set the trade date.
    pub fn with_trade_date(mut self, trade_date: Date) -> Self {
        self.trade_date = trade_date;
        self
    }

    /// Set the step count.
    pub fn with_step_count(mut self, step_count: Size) -> Self {
        self.step_count = step_count;
        self
    }

    /// Set the pruning policy.
    pub fn with_pruning(mut self, pruning: PruningPolicy) -> Self {
        self.pruning = pruning;
        self
    }

    /// Cap the step count.
    pub fn with_step_ceiling(mut self, ceiling: Size) -> Self {
        self.step_ceiling = Some(ceiling);
        self
    }

    /// Check the step count against its bounds and the pruning parameter.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.step_count >= 1,
            "step count must be at least 1, got {}",
            self.step_count
        );
        if let Some(ceiling) = self.step_ceiling {
            ensure!(
                self.step_count <= ceiling,
                "step count {} exceeds the ceiling of {ceiling}",
                self.step_count
            );
        }
        self.pruning.validate()
    }
}
