//! IV rank and IV percentile
//!
//! - rank = clip((IV - min) / (max - min) · 100, 0, 100)
//! - percentile = share of history at or below the current IV, · 100
//!
//! Histories shorter than [`RankConfig::sufficient_samples`] still produce
//! numbers, tagged with a degraded [`DataQuality`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{ensure_positive, AnalyticsError, AnalyticsResult, RankConfig, TimeSeries};

use super::stats::clean_sorted;
use super::{DataQuality, VolatilityStatus};

/// Something about the history that makes the rank suspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RankWarning {
    /// Rank pinned at 0: current IV at or below the historical minimum
    ExtremeLow,
    /// Rank pinned at 100: current IV at or above the historical maximum
    ExtremeHigh,
    /// History has no range (max == min)
    FlatHistory,
    /// History shorter than the full sample
    ShortHistory { available: usize, required: usize },
    /// Non-finite or negative samples removed before ranking
    DroppedSamples(usize),
}

impl fmt::Display for RankWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankWarning::ExtremeLow => {
                write!(f, "IV rank is 0: current IV at the historical low, check for a stale series")
            }
            RankWarning::ExtremeHigh => {
                write!(f, "IV rank is 100: current IV at the historical high, check for a stale series")
            }
            RankWarning::FlatHistory => write!(f, "IV history has no range"),
            RankWarning::ShortHistory {
                available,
                required,
            } => write!(f, "only {available} of {required} history samples available"),
            RankWarning::DroppedSamples(n) => write!(f, "dropped {n} invalid history samples"),
        }
    }
}

/// Position of current IV within its trailing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRankResult {
    pub current_iv: f64,
    /// 0 to 100
    pub iv_rank: f64,
    /// 0 to 100
    pub iv_percentile: f64,
    /// Samples used after cleaning
    pub sample_size: usize,
    pub min_iv: f64,
    pub max_iv: f64,
    pub data_quality: DataQuality,
    /// Tertile of the rank (below/above the configured cut-offs)
    pub rank_status: VolatilityStatus,
    pub warnings: Vec<RankWarning>,
}

impl VolatilityRankResult {
    pub fn is_low_confidence(&self) -> bool {
        self.data_quality.is_degraded()
    }
}

/// IV rank and percentile of `current_iv` against `history`.
///
/// Fails with `InvalidInput` for a non-positive current IV and with
/// `InsufficientData` when no valid history sample remains.
pub fn volatility_rank(
    current_iv: f64,
    history: &[f64],
    config: &RankConfig,
) -> AnalyticsResult<VolatilityRankResult> {
    config.validate()?;
    ensure_positive(current_iv, "current IV")?;

    let (sorted, dropped) = clean_sorted(history);
    let n = sorted.len();
    let (min_iv, max_iv) = match (sorted.first(), sorted.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => return Err(AnalyticsError::insufficient_data(1, 0)),
    };

    let mut warnings = Vec::new();
    if dropped > 0 {
        tracing::warn!("IV rank: dropped {} invalid history samples", dropped);
        warnings.push(RankWarning::DroppedSamples(dropped));
    }

    let range = max_iv - min_iv;
    let iv_rank = if range > 0.0 {
        ((current_iv - min_iv) / range * 100.0).clamp(0.0, 100.0)
    } else {
        warnings.push(RankWarning::FlatHistory);
        if current_iv > max_iv {
            100.0
        } else if current_iv < min_iv {
            0.0
        } else {
            50.0
        }
    };

    let at_or_below = sorted.partition_point(|&v| v <= current_iv);
    let iv_percentile = at_or_below as f64 / n as f64 * 100.0;

    if iv_rank <= 0.0 {
        warnings.push(RankWarning::ExtremeLow);
    } else if iv_rank >= 100.0 {
        warnings.push(RankWarning::ExtremeHigh);
    }

    let data_quality =
        DataQuality::from_sample_size(n, config.sufficient_samples, config.limited_samples);
    if data_quality.is_degraded() {
        tracing::warn!(
            "IV rank computed on {} samples ({} needed): {} data",
            n,
            config.sufficient_samples,
            data_quality.label()
        );
        warnings.push(RankWarning::ShortHistory {
            available: n,
            required: config.sufficient_samples,
        });
    }

    let rank_status = if iv_rank < config.low_rank_cutoff {
        VolatilityStatus::Low
    } else if iv_rank > config.high_rank_cutoff {
        VolatilityStatus::High
    } else {
        VolatilityStatus::Normal
    };

    Ok(VolatilityRankResult {
        current_iv,
        iv_rank,
        iv_percentile,
        sample_size: n,
        min_iv,
        max_iv,
        data_quality,
        rank_status,
        warnings,
    })
}

/// IV rank against a timestamped IV history
pub fn volatility_rank_series(
    current_iv: f64,
    history: &TimeSeries,
    config: &RankConfig,
) -> AnalyticsResult<VolatilityRankResult> {
    volatility_rank(current_iv, &history.values(), config)
}
