//! Black-Scholes Greeks
//!
//! Analytic sensitivities built on the d1/d2 returned by
//! [`price_snapshot`](super::black_scholes::price_snapshot), so prices and
//! Greeks can never disagree about the intermediates.
//!
//! Units follow [`Greeks`]: annualized theta, vega per unit vol, rho per unit rate.

use crate::core::{AnalyticsResult, Greeks, MarketSnapshot, OptionType};

use super::black_scholes::{norm_cdf, norm_pdf, price_snapshot, PricingResult};

/// Black-Scholes Greeks.
///
/// Fails with `InvalidInput` under the same conditions as
/// [`price`](super::black_scholes::price).
pub fn greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> AnalyticsResult<Greeks> {
    let snapshot = MarketSnapshot::new(spot, strike, rate, time, vol)?.with_dividend_yield(div)?;
    Ok(greeks_snapshot(&snapshot, option_type))
}

/// Greeks for a validated snapshot
pub fn greeks_snapshot(snapshot: &MarketSnapshot, option_type: OptionType) -> Greeks {
    let pricing = price_snapshot(snapshot, option_type);
    greeks_from_pricing(snapshot, &pricing)
}

/// Call and put Greeks for the same strike and expiry
pub fn greeks_pair(snapshot: &MarketSnapshot) -> (Greeks, Greeks) {
    (
        greeks_snapshot(snapshot, OptionType::Call),
        greeks_snapshot(snapshot, OptionType::Put),
    )
}

/// Greeks from an existing pricing result for the same snapshot
pub fn greeks_from_pricing(snapshot: &MarketSnapshot, pricing: &PricingResult) -> Greeks {
    let MarketSnapshot {
        spot,
        strike,
        rate,
        time,
        vol,
        dividend_yield: div,
    } = *snapshot;
    let PricingResult { d1, d2, .. } = *pricing;

    let sqrt_t = time.sqrt();
    let df = snapshot.discount_factor();
    let div_factor = snapshot.dividend_factor();
    let pdf_d1 = norm_pdf(d1);

    let delta = match pricing.option_type {
        OptionType::Call => div_factor * norm_cdf(d1),
        OptionType::Put => div_factor * (norm_cdf(d1) - 1.0),
    };

    // Same for call and put
    let gamma = div_factor * pdf_d1 / (spot * vol * sqrt_t);
    let vega = vega_from_d1(snapshot, d1);

    let decay = -spot * div_factor * pdf_d1 * vol / (2.0 * sqrt_t);
    let theta = match pricing.option_type {
        OptionType::Call => {
            decay - rate * strike * df * norm_cdf(d2) + div * spot * div_factor * norm_cdf(d1)
        }
        OptionType::Put => {
            decay + rate * strike * df * norm_cdf(-d2) - div * spot * div_factor * norm_cdf(-d1)
        }
    };

    let rho = match pricing.option_type {
        OptionType::Call => strike * time * df * norm_cdf(d2),
        OptionType::Put => -strike * time * df * norm_cdf(-d2),
    };

    Greeks {
        option_type: pricing.option_type,
        delta,
        gamma,
        theta,
        vega,
        rho,
    }
}

/// Vega per unit vol: S·e^(-qT)·φ(d1)·√T
pub(crate) fn vega_from_d1(snapshot: &MarketSnapshot, d1: f64) -> f64 {
    snapshot.spot * snapshot.dividend_factor() * norm_pdf(d1) * snapshot.time.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn atm() -> MarketSnapshot {
        MarketSnapshot::new(100.0, 100.0, 0.05, 1.0, 0.20).unwrap()
    }

    #[test]
    fn test_reference_greeks() {
        let (call, put) = greeks_pair(&atm());

        assert_abs_diff_eq!(call.delta, 0.6368, epsilon = 1e-4);
        assert_abs_diff_eq!(put.delta, -0.3632, epsilon = 1e-4);
        assert_abs_diff_eq!(call.gamma, 0.018762, epsilon = 1e-5);
        assert_abs_diff_eq!(call.vega, 37.524, epsilon = 1e-2);
        assert_abs_diff_eq!(call.theta, -6.414, epsilon = 1e-2);
        assert_abs_diff_eq!(put.theta, -1.658, epsilon = 1e-2);
        assert_abs_diff_eq!(call.rho, 53.232, epsilon = 1e-2);
        assert_abs_diff_eq!(put.rho, -41.890, epsilon = 1e-2);
    }

    #[test]
    fn test_call_put_relations() {
        let (call, put) = greeks_pair(&atm());
        assert_abs_diff_eq!(call.delta - put.delta, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(call.gamma, put.gamma, epsilon = 1e-15);
        assert_abs_diff_eq!(call.vega, put.vega, epsilon = 1e-12);
    }

    #[test]
    fn test_dividend_delta_gap() {
        let snap = atm().with_dividend_yield(0.03).unwrap();
        let (call, put) = greeks_pair(&snap);
        assert_abs_diff_eq!(call.delta - put.delta, (-0.03_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let snap = MarketSnapshot::new(100.0, 110.0, 0.02, 0.5, 0.30).unwrap();
        let h = 1e-5;
        let up = price_snapshot(&snap.with_vol(0.30 + h).unwrap(), OptionType::Call).price;
        let down = price_snapshot(&snap.with_vol(0.30 - h).unwrap(), OptionType::Call).price;
        let fd_vega = (up - down) / (2.0 * h);

        let g = greeks_snapshot(&snap, OptionType::Call);
        assert_abs_diff_eq!(g.vega, fd_vega, epsilon = 1e-4);
    }

    #[test]
    fn test_theta_matches_finite_difference() {
        let snap = MarketSnapshot::new(100.0, 95.0, 0.05, 0.5, 0.25)
            .unwrap()
            .with_dividend_yield(0.02)
            .unwrap();
        let h = 1e-5;
        let mut shorter = snap;
        shorter.time -= h;
        let fd_theta = (price_snapshot(&shorter, OptionType::Put).price
            - price_snapshot(&snap, OptionType::Put).price)
            / h;

        let g = greeks_snapshot(&snap, OptionType::Put);
        assert_abs_diff_eq!(g.theta, fd_theta, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_input_propagates() {
        assert!(greeks(100.0, 100.0, 0.05, 0.0, 0.0, 1.0, OptionType::Call).is_err());
        assert!(greeks(100.0, 100.0, 0.05, 0.0, 0.2, -1.0, OptionType::Put).is_err());
    }
}
