use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tri_instruments::{ExerciseStyle, OptionContract, OptionType};
use tri_market::MarketModel;
use tri_methods::PruningPolicy;
use tri_pricingengines::{GreeksEngine, GreeksMode, PricerParameters, TrinomialEngine};
use tri_time::{date, Date};

fn inputs() -> (MarketModel, OptionContract, Date) {
    let trade = date(2025, 1, 1).expect("valid date");
    let market = MarketModel::without_dividend(0.04, 0.25, 100.0).expect("valid market");
    let contract = OptionContract::new(
        OptionType::Put,
        ExerciseStyle::American,
        105.0,
        date(2026, 1, 1).expect("valid date"),
    )
    .expect("valid contract");
    (market, contract, trade)
}

fn bench_american_put_steps(c: &mut Criterion) {
    let (market, contract, trade) = inputs();
    let mut group = c.benchmark_group("american_put_trinomial");
    for steps in [100_usize, 500, 1000] {
        let engine = TrinomialEngine::new(PricerParameters::new(trade, steps));
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
            b.iter(|| {
                let px = engine
                    .price(black_box(&market), black_box(&contract))
                    .expect("pricing should succeed")
                    .price;
                black_box(px)
            })
        });
    }
    group.finish();
}

fn bench_pruning(c: &mut Criterion) {
    let (market, contract, trade) = inputs();
    let mut group = c.benchmark_group("pruning_1000_steps");
    let policies = [
        ("none", PruningPolicy::None),
        ("probability_1e-10", PruningPolicy::ByProbability(1e-10)),
        ("std_dev_6", PruningPolicy::ByStdDev(6.0)),
    ];
    for (name, policy) in policies {
        let engine = TrinomialEngine::new(PricerParameters::new(trade, 1000).with_pruning(policy));
        group.bench_function(name, |b| {
            b.iter(|| {
                engine
                    .price(black_box(&market), black_box(&contract))
                    .expect("pricing should succeed")
                    .price
            })
        });
    }
    group.finish();
}

fn bench_greeks(c: &mut Criterion) {
    let (market, contract, trade) = inputs();
    let engine = GreeksEngine::new(PricerParameters::new(trade, 300));
    for (name, mode) in [
        ("greeks_fd_300", GreeksMode::FiniteDifference),
        ("greeks_tree_300", GreeksMode::TreeBased),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                engine
                    .compute(black_box(&market), black_box(&contract), mode)
                    .expect("greeks should succeed")
            })
        });
    }
}

criterion_group!(benches, bench_american_put_steps, bench_pruning, bench_greeks);
criterion_main!(benches);
