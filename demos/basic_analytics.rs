//! Example: Full analytics run for one contract
//!
//! Run with: cargo run --example basic_analytics

use options_analytics::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> AnalyticsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AnalyticsConfig::default();

    // Option parameters
    let snapshot = MarketSnapshot::new(100.0, 100.0, 0.05, 1.0, 0.20)?;

    println!("=== Black-Scholes Pricing ===\n");
    println!("Spot:     ${:.2}", snapshot.spot);
    println!("Strike:   ${:.2}", snapshot.strike);
    println!("Time:     {:.2} years", snapshot.time);
    println!("Rate:     {:.1}%", snapshot.rate * 100.0);
    println!("Vol:      {:.1}%\n", snapshot.vol * 100.0);

    let call = price_snapshot(&snapshot, OptionType::Call);
    let put = price_snapshot(&snapshot, OptionType::Put);
    println!("Call Price: ${:.4}  (d1 {:.4}, d2 {:.4})", call.price, call.d1, call.d2);
    println!("Put Price:  ${:.4}", put.price);

    println!("\n=== Greeks ===\n");
    let (call_greeks, put_greeks) = greeks_pair(&snapshot);
    for g in [call_greeks, put_greeks] {
        println!("{}:", g.option_type.label());
        println!("  Delta:  {:.4}", g.delta);
        println!("  Gamma:  {:.4}", g.gamma);
        println!("  Theta:  {:.4} /yr ({:.4} /day)", g.theta, g.theta_per_day());
        println!("  Vega:   {:.4} per vol ({:.4} per point)", g.vega, g.vega_per_vol_point());
        println!("  Rho:    {:.4}", g.rho);
    }

    println!("\n=== Implied Volatility ===\n");
    let market_price = 11.0;
    let iv = solve_implied_volatility(
        market_price,
        snapshot.spot,
        snapshot.strike,
        snapshot.rate,
        snapshot.dividend_yield,
        snapshot.time,
        OptionType::Call,
        &config.solver,
    )?;
    println!(
        "Market price ${:.2} -> IV {:.2}% ({:?} after {} iterations, bracket used: {})",
        market_price,
        iv.implied_volatility * 100.0,
        iv.status,
        iv.iterations,
        iv.bracket_used
    );

    println!("\n=== Put-Call Parity ===\n");
    let report = parity_report(market_price, put.price, &snapshot, config.parity.transaction_cost)?;
    for check in [report.market, report.model] {
        println!(
            "{:?}: C - P = {:.4}, S - K e^(-rT) = {:.4}, deviation {:+.4} -> {}",
            check.source,
            check.synthetic_value,
            check.parity_value,
            check.deviation,
            check.strategy.label()
        );
    }

    println!("\n=== Volatility History ===\n");
    // Deterministic synthetic history: a slow IV cycle and a noisy price path
    let iv_history: Vec<f64> = (0..300)
        .map(|i| 0.20 + 0.06 * (i as f64 / 40.0).sin())
        .collect();
    let prices: Vec<f64> = (0..120)
        .map(|i| 100.0 * (0.002 * i as f64 + 0.012 * (i as f64 * 1.7).sin()).exp())
        .collect();

    for hv in historical_volatility_multi(&prices, &config.historical.default_windows, &config.historical)? {
        println!("HV {:>3}d: {:.2}%", hv.window, hv.volatility * 100.0);
    }

    let current_iv = iv.implied_volatility;
    let rank = volatility_rank(current_iv, &iv_history, &config.rank)?;
    println!(
        "\nIV rank {:.1}, percentile {:.1} ({} samples, {})",
        rank.iv_rank,
        rank.iv_percentile,
        rank.sample_size,
        rank.data_quality.label()
    );
    for warning in &rank.warnings {
        println!("  warning: {warning}");
    }

    let threshold = classify_iv(current_iv, &iv_history, &config.threshold)?.with_cross_validation(&rank);
    println!(
        "IV {:.2}% is {} (band {:.2}% - {:.2}%, boundary warning: {})",
        current_iv * 100.0,
        threshold.status,
        threshold.low_threshold * 100.0,
        threshold.high_threshold * 100.0,
        threshold.boundary_warning
    );
    if let Some(cv) = &threshold.cross_validation {
        println!("Rank says {} -> agree: {}", cv.rank_status, cv.agrees);
        for reason in &cv.reasons {
            println!("  {reason}");
        }
    }

    Ok(())
}
