//! The façade exposes a complete pricing workflow.

use approx::assert_abs_diff_eq;
use trinomial::prelude::*;

#[test]
fn price_through_both_engines() {
    let trade = date(2025, 1, 1).unwrap();
    let market = MarketModel::without_dividend(0.04, 0.25, 100.0).unwrap();
    let call = OptionContract::new(
        OptionType::Call,
        ExerciseStyle::European,
        105.0,
        date(2026, 1, 1).unwrap(),
    )
    .unwrap();

    let engines: Vec<Box<dyn PricingEngine>> = vec![
        Box::new(TrinomialEngine::new(PricerParameters::new(trade, 400))),
        Box::new(ReferencePricer::new(trade)),
    ];
    let prices: Vec<Real> = engines
        .iter()
        .map(|e| e.npv(&market, &call).unwrap())
        .collect();
    assert_abs_diff_eq!(prices[0], prices[1], epsilon = 1e-2);
}

#[test]
fn errors_surface_through_the_prelude() {
    let err = MarketModel::without_dividend(0.04, -0.1, 100.0).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
