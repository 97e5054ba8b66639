use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use options_analytics::prelude::*;

fn bench_pricing(c: &mut Criterion) {
    let snapshot = MarketSnapshot::new(100.0, 105.0, 0.04, 0.5, 0.25)
        .and_then(|s| s.with_dividend_yield(0.01))
        .expect("benchmark snapshot should be valid");

    c.bench_function("bs_price_call", |b| {
        b.iter(|| price_snapshot(black_box(&snapshot), OptionType::Call))
    });

    c.bench_function("bs_greeks_pair", |b| b.iter(|| greeks_pair(black_box(&snapshot))));
}

fn bench_implied_vol(c: &mut Criterion) {
    let target = bs_price(100.0, 105.0, 0.04, 0.0, 0.25, 0.5, OptionType::Call)
        .expect("benchmark price should succeed")
        .price;

    c.bench_function("iv_newton_atm", |b| {
        b.iter(|| {
            implied_volatility(
                black_box(target),
                100.0,
                105.0,
                0.04,
                0.0,
                0.5,
                OptionType::Call,
            )
        })
    });

    let config = SolverConfig {
        initial_guess: 0.01,
        ..Default::default()
    };
    let wing = bs_price(100.0, 160.0, 0.04, 0.0, 0.9, 0.1, OptionType::Call)
        .expect("benchmark price should succeed")
        .price;
    c.bench_function("iv_bisection_fallback", |b| {
        b.iter(|| {
            solve_implied_volatility(
                black_box(wing),
                100.0,
                160.0,
                0.04,
                0.0,
                0.1,
                OptionType::Call,
                &config,
            )
        })
    });
}

fn bench_volatility_stats(c: &mut Criterion) {
    let prices: Vec<f64> = (0..1_000)
        .map(|i| 100.0 * (0.01 * (i as f64 * 0.37).sin()).exp())
        .collect();
    let history: Vec<f64> = (0..252).map(|i| 0.2 + 0.05 * (i as f64 / 30.0).cos()).collect();
    let hv_config = HistoricalVolConfig::default();

    c.bench_function("hv_multi_window", |b| {
        b.iter(|| historical_volatility_multi(black_box(&prices), &[10, 20, 30, 60, 90], &hv_config))
    });

    let rank_config = RankConfig::default();
    c.bench_function("iv_rank_252", |b| {
        b.iter(|| volatility_rank(black_box(0.22), black_box(&history), &rank_config))
    });
}

criterion_group!(benches, bench_pricing, bench_implied_vol, bench_volatility_stats);
criterion_main!(benches);
