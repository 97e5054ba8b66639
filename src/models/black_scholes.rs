//! Black-Scholes Model
//!
//! Closed-form European pricing with a continuous dividend yield `q`:
//!
//! ```text
//! d1   = (ln(S/K) + (r - q + σ²/2)·T) / (σ·√T)
//! d2   = d1 - σ·√T
//! call = S·e^(-qT)·N(d1) - K·e^(-rT)·N(d2)
//! put  = K·e^(-rT)·N(-d2) - S·e^(-qT)·N(-d1)
//! ```
//!
//! With `q = 0` these are the textbook formulas. [`price_snapshot`] is the only
//! place d1/d2 are computed; the Greeks engine and the IV solver go through it.

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::core::{AnalyticsResult, MarketSnapshot, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Theoretical price together with the d1/d2 it was built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub option_type: OptionType,
    /// Theoretical option price
    pub price: f64,
    pub d1: f64,
    /// Always `d1 - vol·√T`
    pub d2: f64,
}

/// Black-Scholes European option price.
///
/// Fails with `InvalidInput` when spot, strike, vol or time is not positive.
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> AnalyticsResult<PricingResult> {
    let snapshot = MarketSnapshot::new(spot, strike, rate, time, vol)?.with_dividend_yield(div)?;
    Ok(price_snapshot(&snapshot, option_type))
}

/// Price a validated snapshot.
///
/// Callers building a [`MarketSnapshot`] by hand should run
/// [`MarketSnapshot::validate`] first; [`price`] does that for you.
pub fn price_snapshot(snapshot: &MarketSnapshot, option_type: OptionType) -> PricingResult {
    let MarketSnapshot {
        spot,
        strike,
        rate,
        time,
        vol,
        dividend_yield: div,
    } = *snapshot;

    let vol_sqrt_t = vol * time.sqrt();
    let d1 = ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    let df = snapshot.discount_factor();
    let div_factor = snapshot.dividend_factor();

    let price = match option_type {
        OptionType::Call => spot * div_factor * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * div_factor * norm_cdf(-d1),
    };

    PricingResult {
        option_type,
        // Deep OTM legs can round a hair below zero
        price: price.max(0.0),
        d1,
        d2,
    }
}

/// Lower no-arbitrage bound for a European price: discounted intrinsic on the forward
pub fn lower_bound(snapshot: &MarketSnapshot, option_type: OptionType) -> f64 {
    let spot_pv = snapshot.spot * snapshot.dividend_factor();
    let strike_pv = snapshot.strike * snapshot.discount_factor();
    option_type.intrinsic(spot_pv, strike_pv)
}

/// Upper no-arbitrage bound: the call is worth at most the (dividend-adjusted)
/// spot, the put at most the discounted strike
pub fn upper_bound(snapshot: &MarketSnapshot, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => snapshot.spot * snapshot.dividend_factor(),
        OptionType::Put => snapshot.strike * snapshot.discount_factor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
        assert!((norm_cdf(1.0) + norm_cdf(-1.0) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_norm_pdf() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_4, epsilon = 1e-9);
        assert_abs_diff_eq!(norm_pdf(1.5), norm_pdf(-1.5), epsilon = 1e-15);
    }

    #[test]
    fn test_reference_prices() {
        let call = price(100.0, 100.0, 0.05, 0.0, 0.20, 1.0, OptionType::Call).unwrap();
        let put = price(100.0, 100.0, 0.05, 0.0, 0.20, 1.0, OptionType::Put).unwrap();

        assert_abs_diff_eq!(call.price, 10.4506, epsilon = 1e-3);
        assert_abs_diff_eq!(put.price, 5.5735, epsilon = 1e-3);

        // Put-call parity
        let parity = call.price - put.price - (100.0 - 100.0 * (-0.05_f64).exp());
        assert!(parity.abs() < 1e-10);
    }

    #[test]
    fn test_d1_d2_relation() {
        let result = price(120.0, 100.0, 0.03, 0.01, 0.35, 0.75, OptionType::Put).unwrap();
        assert_abs_diff_eq!(result.d1 - result.d2, 0.35 * 0.75_f64.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_dividend_parity() {
        let snap = MarketSnapshot::new(100.0, 95.0, 0.04, 0.5, 0.25)
            .unwrap()
            .with_dividend_yield(0.03)
            .unwrap();
        let call = price_snapshot(&snap, OptionType::Call).price;
        let put = price_snapshot(&snap, OptionType::Put).price;
        let rhs = 100.0 * (-0.03_f64 * 0.5).exp() - 95.0 * (-0.04_f64 * 0.5).exp();
        assert_abs_diff_eq!(call - put, rhs, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(price(0.0, 100.0, 0.05, 0.0, 0.2, 1.0, OptionType::Call).is_err());
        assert!(price(100.0, 0.0, 0.05, 0.0, 0.2, 1.0, OptionType::Call).is_err());
        assert!(price(100.0, 100.0, 0.05, 0.0, 0.2, 0.0, OptionType::Call).is_err());
        assert!(price(100.0, 100.0, 0.05, 0.0, -0.2, 1.0, OptionType::Put).is_err());
    }

    #[test]
    fn test_price_within_bounds() {
        let snap = MarketSnapshot::new(100.0, 80.0, 0.05, 0.25, 0.3).unwrap();
        for option_type in [OptionType::Call, OptionType::Put] {
            let p = price_snapshot(&snap, option_type).price;
            assert!(p >= lower_bound(&snap, option_type) - 1e-12);
            assert!(p <= upper_bound(&snap, option_type));
        }
    }
}
