//! The `PricingEngine` trait and its result type.

use crate::option::OptionContract;
use std::collections::BTreeMap;
use tri_core::{Real, Result};
use tri_market::MarketModel;

/// Results of pricing a contract.
///
/// Holds the NPV plus any additional named results (e.g. "delta",
/// "gamma").
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Additional named results.
    pub additional_results: BTreeMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: BTreeMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// A pricing engine for vanilla option contracts.
pub trait PricingEngine: std::fmt::Debug + Send + Sync {
    /// Price `contract` under `market`.
    fn calculate(&self, market: &MarketModel, contract: &OptionContract) -> Result<PricingResults>;

    /// Net present value only.
    fn npv(&self, market: &MarketModel, contract: &OptionContract) -> Result<Real> {
        Ok(self.calculate(market, contract)?.npv)
    }
}
