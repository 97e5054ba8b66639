//! Sample statistics shared by the volatility engines

use statrs::statistics::Statistics;

use crate::core::{AnalyticsError, AnalyticsResult};

/// Log returns ln(P_i / P_{i-1}); every price must be positive and finite
pub(crate) fn log_returns(prices: &[f64]) -> AnalyticsResult<Vec<f64>> {
    if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(AnalyticsError::invalid_input(format!(
            "prices must be positive and finite, got {bad}"
        )));
    }
    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Sample standard deviation (n - 1 denominator). NaN for fewer than 2 values.
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    values.iter().std_dev()
}

/// Linear-interpolated percentile of ascending `sorted` data, `pct` in [0, 100].
///
/// Position `pct/100 * (n-1)`, interpolating between neighbours.
pub(crate) fn percentile(sorted: &[f64], pct: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = (pct.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
        }
    }
}

/// Keep finite, non-negative samples; returns them sorted ascending plus the
/// number dropped
pub(crate) fn clean_sorted(values: &[f64]) -> (Vec<f64>, usize) {
    let mut kept: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .collect();
    let dropped = values.len() - kept.len();
    kept.sort_by(f64::total_cmp);
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_returns() {
        let r = log_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(r.len(), 2);
        assert!((r[0] - (1.1_f64).ln()).abs() < 1e-15);
        assert!((r[1] - (0.9_f64).ln()).abs() < 1e-15);

        assert!(log_returns(&[100.0, 0.0, 101.0]).is_err());
        assert!(log_returns(&[100.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_sample_std_dev() {
        // Sample variance of [1, 2, 3, 4] is 5/3
        let sd = sample_std_dev(&[1.0, 2.0, 3.0, 4.0]);
        assert!((sd - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[0.0, 0.0, 0.0]), 0.0);
        assert!(sample_std_dev(&[1.0]).is_nan());
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 50.0), Some(3.0));
        assert_eq!(percentile(&data, 100.0), Some(5.0));
        assert!((percentile(&data, 25.0).unwrap() - 2.0).abs() < 1e-12);

        let even = [10.0, 20.0, 30.0, 40.0];
        // pos = 0.75 * 3 = 2.25
        assert!((percentile(&even, 75.0).unwrap() - 32.5).abs() < 1e-12);
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 90.0), Some(7.0));
    }

    #[test]
    fn test_clean_sorted() {
        let (kept, dropped) = clean_sorted(&[0.3, f64::NAN, 0.1, -0.2, f64::INFINITY, 0.2]);
        assert_eq!(kept, vec![0.1, 0.2, 0.3]);
        assert_eq!(dropped, 3);
    }
}
