//! Historical (realized) volatility
//!
//! σ_realized = stdev(ln(P_i / P_{i-1})) · √(trading days per year), taken over
//! the trailing `window` returns, i.e. the last `window + 1` prices.

use serde::{Deserialize, Serialize};

use crate::core::{
    ensure_positive, AnalyticsError, AnalyticsResult, HistoricalVolConfig, TimeSeries,
};

use super::stats::{log_returns, sample_std_dev};

/// Realized volatility over one trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityWindowResult {
    /// Window length in trading days (number of returns)
    pub window: usize,
    /// Annualized realized volatility
    pub volatility: f64,
}

/// Realized volatility with the default 252-day annualization
pub fn historical_volatility(prices: &[f64], window: usize) -> AnalyticsResult<VolatilityWindowResult> {
    historical_volatility_with_config(prices, window, &HistoricalVolConfig::default())
}

/// Realized volatility over the trailing `window` returns.
///
/// Needs at least `window + 1` prices, otherwise `InsufficientData`. Fails
/// with `InvalidInput` for a window under 2 or a non-positive price inside
/// the window.
pub fn historical_volatility_with_config(
    prices: &[f64],
    window: usize,
    config: &HistoricalVolConfig,
) -> AnalyticsResult<VolatilityWindowResult> {
    if window < 2 {
        return Err(AnalyticsError::invalid_input(format!(
            "volatility window needs at least 2 returns, got {window}"
        )));
    }
    ensure_positive(config.trading_days_per_year, "trading days per year")?;

    let required = window + 1;
    if prices.len() < required {
        return Err(AnalyticsError::insufficient_data(required, prices.len()));
    }

    let trailing = &prices[prices.len() - required..];
    let returns = log_returns(trailing)?;
    let volatility = sample_std_dev(&returns) * config.trading_days_per_year.sqrt();

    Ok(VolatilityWindowResult { window, volatility })
}

/// One result per window, in the order given.
///
/// Windows whose data requirement is unmet are skipped and the rest still
/// succeed. Any other failure (a window under 2, a bad price inside a window)
/// is returned as an error.
pub fn historical_volatility_multi(
    prices: &[f64],
    windows: &[usize],
    config: &HistoricalVolConfig,
) -> AnalyticsResult<Vec<VolatilityWindowResult>> {
    let mut results = Vec::with_capacity(windows.len());
    for &window in windows {
        match historical_volatility_with_config(prices, window, config) {
            Ok(result) => results.push(result),
            Err(e @ AnalyticsError::InsufficientData { .. }) => {
                tracing::debug!("Skipping {}-day realized vol: {}", window, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(results)
}

/// Realized volatility over a timestamped price series
pub fn historical_volatility_series(
    series: &TimeSeries,
    window: usize,
    config: &HistoricalVolConfig,
) -> AnalyticsResult<VolatilityWindowResult> {
    historical_volatility_with_config(&series.values(), window, config)
}

/// Implied volatility measured against one realized-vol window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvHvComparison {
    pub window: usize,
    pub implied_volatility: f64,
    pub realized_volatility: f64,
    /// IV - HV, in vol units
    pub premium: f64,
    /// IV / HV; `None` when realized vol is zero
    pub ratio: Option<f64>,
}

/// IV premium over each realized-vol window
pub fn compare_iv_to_hv(
    current_iv: f64,
    realized: &[VolatilityWindowResult],
) -> AnalyticsResult<Vec<IvHvComparison>> {
    ensure_positive(current_iv, "current IV")?;

    Ok(realized
        .iter()
        .map(|hv| IvHvComparison {
            window: hv.window,
            implied_volatility: current_iv,
            realized_volatility: hv.volatility,
            premium: current_iv - hv.volatility,
            ratio: (hv.volatility > 0.0).then(|| current_iv / hv.volatility),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Prices alternating +1% / -1% in log space
    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 * if i % 2 == 0 { 1.0 } else { 0.01_f64.exp() })
            .collect()
    }

    #[test]
    fn test_constant_prices_have_zero_vol() {
        let prices = vec![50.0; 40];
        let result = historical_volatility(&prices, 20).unwrap();
        assert_eq!(result.window, 20);
        assert_eq!(result.volatility, 0.0);
    }

    #[test]
    fn test_known_volatility() {
        // 20 returns alternating +0.01 / -0.01, mean 0, sample variance 20 * 1e-4 / 19
        let prices = zigzag(21);
        let result = historical_volatility(&prices, 20).unwrap();
        let expected = (20.0 * 1e-4 / 19.0_f64).sqrt() * 252.0_f64.sqrt();
        assert_abs_diff_eq!(result.volatility, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_uses_trailing_window_only() {
        // Wild early history followed by a flat tail
        let mut prices = vec![100.0, 150.0, 80.0, 130.0];
        prices.extend(std::iter::repeat(120.0).take(11));
        let result = historical_volatility(&prices, 10).unwrap();
        assert_eq!(result.volatility, 0.0);
    }

    #[test]
    fn test_insufficient_data() {
        let prices = zigzag(20);
        match historical_volatility(&prices, 20) {
            Err(AnalyticsError::InsufficientData {
                required,
                available,
            }) => {
                assert_eq!(required, 21);
                assert_eq!(available, 20);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_window_and_prices() {
        assert!(matches!(
            historical_volatility(&zigzag(10), 1),
            Err(AnalyticsError::InvalidInput(_))
        ));
        let mut prices = zigzag(10);
        prices[8] = -1.0;
        assert!(historical_volatility(&prices, 5).is_err());
    }

    #[test]
    fn test_multi_skips_unmet_windows() {
        let prices = zigzag(31);
        let config = HistoricalVolConfig::default();
        let results = historical_volatility_multi(&prices, &[10, 60, 30], &config).unwrap();

        let windows: Vec<usize> = results.iter().map(|r| r.window).collect();
        assert_eq!(windows, vec![10, 30]);
    }

    #[test]
    fn test_multi_propagates_invalid_input() {
        let config = HistoricalVolConfig::default();
        let mut prices: Vec<f64> = (100..140).map(f64::from).collect();
        prices[35] = -5.0;

        assert!(matches!(
            historical_volatility_multi(&prices, &[10, 20], &config),
            Err(AnalyticsError::InvalidInput(_))
        ));
        assert!(matches!(
            historical_volatility_multi(&zigzag(31), &[10, 1], &config),
            Err(AnalyticsError::InvalidInput(_))
        ));
        // A bad price outside every requested window is never read
        assert_eq!(historical_volatility_multi(&prices, &[3], &config).unwrap().len(), 1);
    }

    #[test]
    fn test_custom_annualization() {
        let prices = zigzag(11);
        let daily = HistoricalVolConfig {
            trading_days_per_year: 1.0,
            ..Default::default()
        };
        let raw = historical_volatility_with_config(&prices, 10, &daily).unwrap();
        let annual = historical_volatility(&prices, 10).unwrap();
        assert_abs_diff_eq!(annual.volatility, raw.volatility * 252.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_compare_iv_to_hv() {
        let realized = [
            VolatilityWindowResult { window: 20, volatility: 0.20 },
            VolatilityWindowResult { window: 60, volatility: 0.0 },
        ];
        let cmp = compare_iv_to_hv(0.25, &realized).unwrap();
        assert_abs_diff_eq!(cmp[0].premium, 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(cmp[0].ratio.unwrap(), 1.25, epsilon = 1e-12);
        assert!(cmp[1].ratio.is_none());
        assert!(compare_iv_to_hv(0.0, &realized).is_err());
    }
}
