//! Put-call parity
//!
//! For European options on an underlying paying dividends worth `D` today:
//!
//! ```text
//! C - P = S - D - K·e^(-rT)
//! ```
//!
//! The deviation is the left side minus the right side. A deviation larger than
//! the round-trip transaction cost is an arbitrage:
//!
//! - deviation > 0: the synthetic forward (long call, short put) is rich, so
//!   sell it and buy the underlying (conversion)
//! - deviation < 0: the synthetic is cheap, so buy it and short the
//!   underlying (reversal)
//!
//! Two checks are kept apart. The market check runs on quoted prices and
//! detects market mispricing. The theoretical check runs on Black-Scholes legs
//! and detects model inconsistency. A [`ParityReport`] carries both without
//! merging them.

use serde::{Deserialize, Serialize};

use crate::core::{
    ensure_finite, ensure_non_negative, ensure_positive, AnalyticsResult, MarketSnapshot,
    OptionType, QuoteChain,
};
use crate::models::price_snapshot;

/// Which prices the parity check ran on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParitySource {
    /// Observed call/put quotes
    MarketQuotes,
    /// Black-Scholes legs for the snapshot
    TheoreticalPrices,
}

/// Trade that captures a parity violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParityStrategy {
    /// Sell call, buy put, buy underlying (conversion)
    SellSynthetic,
    /// Buy call, sell put, short underlying (reversal)
    BuySynthetic,
    /// Deviation within transaction costs
    NoTrade,
}

impl ParityStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            ParityStrategy::SellSynthetic => "sell synthetic / buy underlying (conversion)",
            ParityStrategy::BuySynthetic => "buy synthetic / short underlying (reversal)",
            ParityStrategy::NoTrade => "no trade",
        }
    }
}

/// Outcome of one parity check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParityResult {
    pub source: ParitySource,
    pub call_price: f64,
    pub put_price: f64,
    /// C - P
    pub synthetic_value: f64,
    /// S - D - K·e^(-rT)
    pub parity_value: f64,
    /// synthetic_value - parity_value
    pub deviation: f64,
    pub is_arbitrage: bool,
    /// |deviation| - transaction_cost, only when `is_arbitrage`
    pub theoretical_profit: Option<f64>,
    pub transaction_cost: f64,
    pub strategy: ParityStrategy,
}

/// Parity check on quoted call and put prices.
///
/// `dividend_pv` is the present value of dividends paid before expiry.
#[allow(clippy::too_many_arguments)]
pub fn put_call_parity(
    call_price: f64,
    put_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    dividend_pv: f64,
    transaction_cost: f64,
) -> AnalyticsResult<ParityResult> {
    ensure_non_negative(call_price, "call price")?;
    ensure_non_negative(put_price, "put price")?;
    ensure_positive(spot, "spot")?;
    ensure_positive(strike, "strike")?;
    ensure_finite(rate, "rate")?;
    ensure_positive(time, "time to expiry")?;
    ensure_non_negative(dividend_pv, "dividend present value")?;
    ensure_non_negative(transaction_cost, "transaction cost")?;

    let parity_value = spot - dividend_pv - strike * (-rate * time).exp();
    Ok(evaluate(
        ParitySource::MarketQuotes,
        call_price,
        put_price,
        parity_value,
        transaction_cost,
    ))
}

/// Parity check on Black-Scholes legs for the snapshot.
///
/// Dividends enter as `S·(1 - e^(-qT))`, the same continuous yield the
/// pricing kernel uses, so the deviation measures only numerical drift.
pub fn parity_with_theoretical_prices(
    snapshot: &MarketSnapshot,
    transaction_cost: f64,
) -> AnalyticsResult<ParityResult> {
    snapshot.validate()?;
    ensure_non_negative(transaction_cost, "transaction cost")?;

    let call = price_snapshot(snapshot, OptionType::Call).price;
    let put = price_snapshot(snapshot, OptionType::Put).price;
    let parity_value =
        snapshot.spot - snapshot.dividend_pv() - snapshot.strike * snapshot.discount_factor();

    Ok(evaluate(
        ParitySource::TheoreticalPrices,
        call,
        put,
        parity_value,
        transaction_cost,
    ))
}

fn evaluate(
    source: ParitySource,
    call_price: f64,
    put_price: f64,
    parity_value: f64,
    transaction_cost: f64,
) -> ParityResult {
    let synthetic_value = call_price - put_price;
    let deviation = synthetic_value - parity_value;
    let is_arbitrage = deviation.abs() > transaction_cost;

    let strategy = match (is_arbitrage, deviation > 0.0) {
        (false, _) => ParityStrategy::NoTrade,
        (true, true) => ParityStrategy::SellSynthetic,
        (true, false) => ParityStrategy::BuySynthetic,
    };

    ParityResult {
        source,
        call_price,
        put_price,
        synthetic_value,
        parity_value,
        deviation,
        is_arbitrage,
        theoretical_profit: is_arbitrage.then(|| deviation.abs() - transaction_cost),
        transaction_cost,
        strategy,
    }
}

/// Market and model parity for one strike, reported separately
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParityReport {
    /// Parity on the quoted prices
    pub market: ParityResult,
    /// Parity on the Black-Scholes legs at the snapshot vol
    pub model: ParityResult,
    /// Quoted call minus model call
    pub call_model_gap: f64,
    /// Quoted put minus model put
    pub put_model_gap: f64,
}

/// Run both parity checks for quoted prices against a snapshot
pub fn parity_report(
    call_price: f64,
    put_price: f64,
    snapshot: &MarketSnapshot,
    transaction_cost: f64,
) -> AnalyticsResult<ParityReport> {
    snapshot.validate()?;
    let market = put_call_parity(
        call_price,
        put_price,
        snapshot.spot,
        snapshot.strike,
        snapshot.rate,
        snapshot.time,
        snapshot.dividend_pv(),
        transaction_cost,
    )?;
    let model = parity_with_theoretical_prices(snapshot, transaction_cost)?;

    Ok(ParityReport {
        market,
        model,
        call_model_gap: call_price - model.call_price,
        put_model_gap: put_price - model.put_price,
    })
}

/// Market parity at one strike of a chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeParity {
    pub strike: f64,
    pub result: ParityResult,
}

/// Market parity at every strike where both the call and the put have a price
pub fn parity_by_strike(chain: &QuoteChain, transaction_cost: f64) -> Vec<StrikeParity> {
    let dividend_pv = chain.dividend_pv();

    chain
        .strikes()
        .into_iter()
        .filter_map(|strike| {
            let call = chain.call_at(strike)?.best_price()?;
            let put = chain.put_at(strike)?.best_price()?;
            match put_call_parity(
                call,
                put,
                chain.spot,
                strike,
                chain.risk_free_rate,
                chain.time_to_expiry,
                dividend_pv,
                transaction_cost,
            ) {
                Ok(result) => {
                    if result.is_arbitrage {
                        tracing::info!(
                            "Parity violation on {} {} strike {}: deviation {:.4} ({})",
                            chain.underlying,
                            chain.expiry,
                            strike,
                            result.deviation,
                            result.strategy.label()
                        );
                    }
                    Some(StrikeParity { strike, result })
                }
                Err(e) => {
                    tracing::warn!("Skipping parity at strike {}: {}", strike, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionQuote;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn reference() -> MarketSnapshot {
        MarketSnapshot::new(100.0, 100.0, 0.05, 1.0, 0.20).unwrap()
    }

    #[test]
    fn test_reference_parity_holds() {
        let result = parity_with_theoretical_prices(&reference(), 0.0).unwrap();

        assert_eq!(result.source, ParitySource::TheoreticalPrices);
        assert_abs_diff_eq!(result.synthetic_value, 4.877, epsilon = 1e-3);
        assert_abs_diff_eq!(result.parity_value, 4.877, epsilon = 1e-3);
        assert!(result.deviation.abs() < 1e-10);
        assert!(!result.is_arbitrage);
        assert_eq!(result.strategy, ParityStrategy::NoTrade);
        assert!(result.theoretical_profit.is_none());
    }

    #[test]
    fn test_theoretical_parity_with_dividend() {
        let snap = reference().with_dividend_yield(0.04).unwrap();
        let result = parity_with_theoretical_prices(&snap, 0.0).unwrap();
        assert!(result.deviation.abs() < 1e-10);
    }

    #[test]
    fn test_rich_calls_sell_synthetic() {
        // Parity value 4.877; synthetic 6.0
        let result = put_call_parity(11.0, 5.0, 100.0, 100.0, 0.05, 1.0, 0.0, 0.25).unwrap();

        assert!(result.is_arbitrage);
        assert_eq!(result.strategy, ParityStrategy::SellSynthetic);
        assert_abs_diff_eq!(result.deviation, 6.0 - 4.877, epsilon = 1e-3);
        assert_abs_diff_eq!(
            result.theoretical_profit.unwrap(),
            result.deviation - 0.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cheap_calls_buy_synthetic() {
        let result = put_call_parity(9.0, 5.5, 100.0, 100.0, 0.05, 1.0, 0.0, 0.0).unwrap();
        assert!(result.deviation < 0.0);
        assert_eq!(result.strategy, ParityStrategy::BuySynthetic);
    }

    #[test]
    fn test_costs_absorb_small_deviation() {
        let result = put_call_parity(10.5, 5.57, 100.0, 100.0, 0.05, 1.0, 0.0, 0.10).unwrap();
        assert!(result.deviation.abs() < 0.10);
        assert!(!result.is_arbitrage);
        assert_eq!(result.transaction_cost, 0.10);
    }

    #[test]
    fn test_dividend_pv_shifts_parity() {
        let without = put_call_parity(10.0, 6.0, 100.0, 100.0, 0.05, 1.0, 0.0, 0.0).unwrap();
        let with = put_call_parity(10.0, 6.0, 100.0, 100.0, 0.05, 1.0, 2.0, 0.0).unwrap();
        assert_abs_diff_eq!(with.deviation - without.deviation, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(put_call_parity(-1.0, 5.0, 100.0, 100.0, 0.05, 1.0, 0.0, 0.0).is_err());
        assert!(put_call_parity(10.0, 5.0, 100.0, 100.0, 0.05, 0.0, 0.0, 0.0).is_err());
        assert!(put_call_parity(10.0, 5.0, 100.0, 100.0, 0.05, 1.0, 0.0, -0.1).is_err());
        assert!(parity_with_theoretical_prices(&reference(), -1.0).is_err());
    }

    #[test]
    fn test_report_keeps_checks_separate() {
        let report = parity_report(11.0, 5.5735, &reference(), 0.0).unwrap();

        assert_eq!(report.market.source, ParitySource::MarketQuotes);
        assert_eq!(report.model.source, ParitySource::TheoreticalPrices);
        assert!(report.market.is_arbitrage);
        assert!(!report.model.is_arbitrage);
        assert_abs_diff_eq!(report.call_model_gap, 11.0 - 10.4506, epsilon = 1e-3);
        assert_abs_diff_eq!(report.put_model_gap, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_parity_by_strike() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let mut chain = QuoteChain::new("XYZ", 100.0, expiry, as_of, 0.05).unwrap();
        chain.add_quote(OptionQuote::new(OptionType::Call, 100.0).with_last(12.0));
        chain.add_quote(OptionQuote::new(OptionType::Put, 100.0).with_last(5.5));
        chain.add_quote(OptionQuote::new(OptionType::Call, 110.0).with_last(6.0));

        let results = parity_by_strike(&chain, 0.05);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].strike, 100.0);
        assert_eq!(results[0].result.strategy, ParityStrategy::SellSynthetic);
    }

    #[test]
    fn test_parity_by_strike_uses_chain_dividends() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let mut chain = QuoteChain::new("XYZ", 100.0, expiry, as_of, 0.05)
            .unwrap()
            .with_dividend_yield(0.03)
            .unwrap();
        let snap = chain.snapshot_for(100.0, 0.25).unwrap();
        for option_type in [OptionType::Call, OptionType::Put] {
            let p = price_snapshot(&snap, option_type).price;
            chain.add_quote(OptionQuote::new(option_type, 100.0).with_last(p));
        }

        let results = parity_by_strike(&chain, 0.0);
        assert_eq!(results.len(), 1);
        let result = results[0].result;
        assert_abs_diff_eq!(
            result.parity_value,
            100.0 - snap.dividend_pv() - 100.0 * snap.discount_factor(),
            epsilon = 1e-12
        );
        assert!(result.deviation.abs() < 1e-9);
    }
}
