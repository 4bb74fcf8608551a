//! End-to-end lattice pricing against the closed form.

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use proptest::prelude::*;
use tri_core::Error;
use tri_instruments::{ExerciseStyle, OptionContract, OptionType};
use tri_market::MarketModel;
use tri_methods::PruningPolicy;
use tri_pricingengines::{
    black_scholes, convergence_profile, PricerParameters, ReferencePricer, TrinomialEngine,
};
use tri_time::{add_days, date};

// ─── Convergence ──────────────────────────────────────────────────────────────

#[test]
fn european_call_converges_to_black_scholes() {
    init_tracing();
    let reference = ReferencePricer::new(trade_date())
        .calculate(&market(), &european_call())
        .unwrap()
        .price;
    let lattice = TrinomialEngine::new(params(500))
        .price(&market(), &european_call())
        .unwrap()
        .price;
    assert!(
        (lattice - reference).abs() < 1e-2,
        "lattice {lattice:.6} vs reference {reference:.6}"
    );
}

#[test]
fn hundred_steps_within_one_percent() {
    let reference = ReferencePricer::new(trade_date())
        .calculate(&market(), &european_call())
        .unwrap()
        .price;
    let lattice = TrinomialEngine::new(params(100))
        .price(&market(), &european_call())
        .unwrap()
        .price;
    assert!((lattice - reference).abs() / reference < 0.01);
}

#[test]
fn european_put_converges_too() {
    let put = contract(OptionType::Put, ExerciseStyle::European, 95.0);
    let reference = ReferencePricer::new(trade_date())
        .calculate(&market(), &put)
        .unwrap()
        .price;
    let lattice = TrinomialEngine::new(params(500)).price(&market(), &put).unwrap().price;
    assert_abs_diff_eq!(lattice, reference, epsilon = 2e-2);
}

#[test]
fn profile_reports_signed_errors() {
    let profile =
        convergence_profile(&market(), &european_call(), &params(1), &[50, 100, 400]).unwrap();
    assert_eq!(profile.len(), 3);
    for point in &profile {
        assert_abs_diff_eq!(
            point.error,
            point.lattice_price - point.reference_price,
            epsilon = 1e-15
        );
        assert!(point.error.abs() < 0.05, "n = {}: {}", point.step_count, point.error);
    }
}

// ─── Stability ────────────────────────────────────────────────────────────────

#[test]
fn coarse_high_vol_lattice_is_unstable() {
    let wild = MarketModel::without_dividend(0.04, 2.0, 100.0).unwrap();
    let err = TrinomialEngine::new(params(1))
        .price(&wild, &european_call())
        .unwrap_err();
    assert!(matches!(err, Error::LatticeInstability { step_count: 1, .. }));

    let calm = TrinomialEngine::new(params(1)).price(&market(), &european_call());
    assert!(calm.is_ok());
}

#[test]
fn bad_inputs_are_rejected_before_lattice_work() {
    assert!(matches!(
        TrinomialEngine::new(params(0)).price(&market(), &european_call()),
        Err(Error::InvalidInput(_))
    ));
    let expired = TrinomialEngine::new(params(100).with_trade_date(maturity()));
    assert!(matches!(
        expired.price(&market(), &european_call()),
        Err(Error::InvalidInput(_))
    ));
}

// ─── Early exercise ───────────────────────────────────────────────────────────

#[test]
fn american_put_carries_early_exercise_premium() {
    let amer = contract(OptionType::Put, ExerciseStyle::American, 105.0);
    let euro = amer.with_exercise_style(ExerciseStyle::European);
    let engine = TrinomialEngine::new(params(200));
    let a = engine.price(&market(), &amer).unwrap();
    let e = engine.price(&market(), &euro).unwrap();
    assert!(a.price > e.price + 0.1);

    let boundary = a.exercise_boundary.unwrap();
    assert_eq!(boundary.at_level(200), None);
    // the put boundary rises towards the strike as maturity approaches
    let early = boundary.at_level(20).unwrap();
    let late = boundary.at_level(190).unwrap();
    assert!(early < late && late < 105.0);
}

#[test]
fn american_call_on_dividend_payer_may_exercise_early() {
    let div_market =
        MarketModel::new(0.04, 0.25, 100.0, 8.0, Some(add_days(trade_date(), 180).unwrap()))
            .unwrap();
    let amer = contract(OptionType::Call, ExerciseStyle::American, 90.0);
    let euro = amer.with_exercise_style(ExerciseStyle::European);
    let engine = TrinomialEngine::new(params(365));
    let a = engine.price(&div_market, &amer).unwrap();
    let e = engine.price(&div_market, &euro).unwrap();
    assert!(a.price > e.price);
    assert!(!a.exercise_boundary.unwrap().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn american_is_worth_at_least_european(
        strike in 70.0f64..130.0,
        vol in 0.1f64..0.6,
        is_call in any::<bool>(),
    ) {
        let kind = if is_call { OptionType::Call } else { OptionType::Put };
        let m = MarketModel::without_dividend(0.04, vol, 100.0).unwrap();
        let amer = contract(kind, ExerciseStyle::American, strike);
        let euro = amer.with_exercise_style(ExerciseStyle::European);
        let engine = TrinomialEngine::new(params(60));
        let a = engine.price(&m, &amer).unwrap().price;
        let e = engine.price(&m, &euro).unwrap().price;
        prop_assert!(a >= e - 1e-12);
    }
}

// ─── Dividends ────────────────────────────────────────────────────────────────

#[test]
fn zero_dividend_is_bit_identical() {
    let zero =
        MarketModel::new(0.04, 0.25, 100.0, 0.0, Some(add_days(trade_date(), 100).unwrap()))
            .unwrap();
    let engine = TrinomialEngine::new(params(250));
    let a = engine.price(&market(), &european_call()).unwrap().price;
    let b = engine.price(&zero, &european_call()).unwrap().price;
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn dividend_lowers_calls_and_raises_puts() {
    let div = MarketModel::new(0.04, 0.25, 100.0, 2.0, Some(add_days(trade_date(), 100).unwrap()))
        .unwrap();
    let engine = TrinomialEngine::new(params(365));
    let put = contract(OptionType::Put, ExerciseStyle::European, 105.0);

    let c0 = engine.price(&market(), &european_call()).unwrap().price;
    let c1 = engine.price(&div, &european_call()).unwrap();
    let p0 = engine.price(&market(), &put).unwrap().price;
    let p1 = engine.price(&div, &put).unwrap().price;
    assert!(c1.price < c0);
    assert!(p1 > p0);
    assert_eq!(c1.dividend_level, Some(100));
}

/// The cash-dividend lattice sits between the escrowed model, which moves
/// the dividend's whole volatility onto the spot, and the strike-adjusted
/// model, which keeps the full spot volatility.
#[test]
fn dividend_lattice_lies_between_escrowed_and_strike_adjusted() {
    let t_div: f64 = 182.0 / 365.0;
    let div = MarketModel::new(0.04, 0.25, 100.0, 2.0, Some(add_days(trade_date(), 182).unwrap()))
        .unwrap();
    let adjusted_strike = 105.0 + 2.0 * (0.04 * (1.0 - t_div)).exp();
    let engine = TrinomialEngine::new(params(365));

    for kind in [OptionType::Call, OptionType::Put] {
        let option = contract(kind, ExerciseStyle::European, 105.0);
        let escrowed = ReferencePricer::new(trade_date())
            .calculate(&div, &option)
            .unwrap()
            .price;
        let strike_adjusted = black_scholes(kind, 100.0, adjusted_strike, 0.04, 0.25, 1.0).price;
        let lattice = engine.price(&div, &option).unwrap().price;
        assert!(
            escrowed < lattice && lattice < strike_adjusted,
            "{kind}: {escrowed:.4} < {lattice:.4} < {strike_adjusted:.4}"
        );
    }
}

/// American call across a 3.00 dividend paid 232 days into a one-year
/// contract.
#[test]
fn american_call_with_dividend_matches_known_value() {
    init_tracing();
    let trade = date(2025, 9, 1).unwrap();
    let market = MarketModel::new(0.05, 0.30, 100.0, 3.0, Some(date(2026, 4, 21).unwrap())).unwrap();
    let option = OptionContract::new(
        OptionType::Call,
        ExerciseStyle::American,
        102.0,
        date(2026, 9, 1).unwrap(),
    )
    .unwrap();
    let params =
        PricerParameters::new(trade, 400).with_pruning(PruningPolicy::ByProbability(1e-7));
    let r = TrinomialEngine::new(params).price(&market, &option).unwrap();
    assert_abs_diff_eq!(r.price, 11.936849, epsilon = 3e-2);
    assert_eq!(r.dividend_level, Some(255));
    let european = TrinomialEngine::new(params)
        .price(&market, &option.with_exercise_style(ExerciseStyle::European))
        .unwrap()
        .price;
    assert!(european < r.price);
}

#[test]
fn dividend_worth_more_than_spot_is_rejected() {
    let div = MarketModel::new(0.04, 0.25, 100.0, 120.0, Some(add_days(trade_date(), 30).unwrap()))
        .unwrap();
    assert!(matches!(
        TrinomialEngine::new(params(100)).price(&div, &european_call()),
        Err(Error::InvalidInput(_))
    ));
}

// ─── Pruning and determinism ──────────────────────────────────────────────────

#[test]
fn zero_threshold_reproduces_unpruned_price() {
    let plain = TrinomialEngine::new(params(300))
        .price(&market(), &european_call())
        .unwrap();
    let zero = TrinomialEngine::new(params(300).with_pruning(PruningPolicy::ByProbability(0.0)))
        .price(&market(), &european_call())
        .unwrap();
    assert_eq!(plain.price.to_bits(), zero.price.to_bits());
    assert_eq!(plain.statistics, zero.statistics);
}

#[test]
fn pruning_saves_nodes_at_little_cost() {
    let plain = TrinomialEngine::new(params(400))
        .price(&market(), &european_call())
        .unwrap();
    let pruned = TrinomialEngine::new(params(400).with_pruning(PruningPolicy::ByProbability(1e-10)))
        .price(&market(), &european_call())
        .unwrap();
    assert!(pruned.statistics.live_nodes < plain.statistics.live_nodes);
    assert!(pruned.statistics.pruned_nodes() > 0);
    assert_abs_diff_eq!(pruned.price, plain.price, epsilon = 1e-4);
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let engine = TrinomialEngine::new(params(150).with_pruning(PruningPolicy::ByStdDev(4.0)));
    let amer = contract(OptionType::Put, ExerciseStyle::American, 100.0);
    let a = engine.price(&market(), &amer).unwrap();
    let b = engine.price(&market(), &amer).unwrap();
    assert_eq!(a.price.to_bits(), b.price.to_bits());
    assert_eq!(a.exercise_boundary, b.exercise_boundary);
}

#[test]
fn over_aggressive_pruning_is_degenerate() {
    let err = TrinomialEngine::new(params(100).with_pruning(PruningPolicy::ByProbability(0.9)))
        .price(&market(), &european_call())
        .unwrap_err();
    assert_eq!(err, Error::DegenerateLattice { level: 1 });
}
