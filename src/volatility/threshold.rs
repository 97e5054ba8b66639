//! Dynamic IV thresholds
//!
//! LOW / HIGH thresholds are percentiles of the IV history (25th / 75th by
//! default). When the history is too short for percentiles to mean much, the
//! classifier falls back to static multiples of a reference volatility.
//!
//! The result can be cross-validated against a [`VolatilityRankResult`]. The
//! two verdicts are reported side by side; neither overrides the other.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{ensure_positive, AnalyticsResult, ThresholdConfig, TimeSeries};

use super::rank::VolatilityRankResult;
use super::stats::{clean_sorted, percentile};
use super::{DataQuality, VolatilityStatus};

/// How the thresholds were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdMethod {
    /// Percentiles of the IV history
    Percentile,
    /// Reference volatility times fixed multipliers
    StaticFallback,
}

/// Classification of current IV against its thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IVThresholdResult {
    pub current_iv: f64,
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub status: VolatilityStatus,
    pub method: ThresholdMethod,
    pub data_quality: DataQuality,
    /// Valid history samples used
    pub sample_size: usize,
    /// Current IV sits within the boundary margin of either threshold
    pub boundary_warning: bool,
    /// Set by [`IVThresholdResult::with_cross_validation`]
    pub cross_validation: Option<CrossValidation>,
}

/// Why the threshold and rank verdicts may disagree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DivergenceReason {
    /// The two results were computed for different IV readings
    DifferentCurrentIv { threshold_iv: f64, rank_iv: f64 },
    /// The histories behind the two results differ in length
    DifferentSampleWindow {
        threshold_samples: usize,
        rank_samples: usize,
    },
    /// Thresholds came from the static fallback, not the history
    StaticFallbackThresholds,
    /// At least one side has degraded data quality
    LowConfidence,
    /// Percentile band vs min-max rank tertiles
    ThresholdingMethod,
}

impl fmt::Display for DivergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceReason::DifferentCurrentIv {
                threshold_iv,
                rank_iv,
            } => write!(
                f,
                "different current IV readings ({threshold_iv:.4} vs {rank_iv:.4})"
            ),
            DivergenceReason::DifferentSampleWindow {
                threshold_samples,
                rank_samples,
            } => write!(
                f,
                "different sample windows ({threshold_samples} vs {rank_samples} observations)"
            ),
            DivergenceReason::StaticFallbackThresholds => {
                write!(f, "thresholds use the static fallback, not the IV history")
            }
            DivergenceReason::LowConfidence => write!(f, "history too short for full confidence"),
            DivergenceReason::ThresholdingMethod => write!(
                f,
                "percentile thresholds and min-max rank tertiles weigh the history differently"
            ),
        }
    }
}

/// Side-by-side comparison of the threshold verdict and the rank verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub threshold_status: VolatilityStatus,
    pub rank_status: VolatilityStatus,
    pub iv_rank: f64,
    pub agrees: bool,
    /// Empty when the verdicts agree
    pub reasons: Vec<DivergenceReason>,
}

impl IVThresholdResult {
    /// Compare this classification with the rank engine's tertile
    pub fn cross_validate(&self, rank: &VolatilityRankResult) -> CrossValidation {
        let agrees = self.status == rank.rank_status;
        let mut reasons = Vec::new();

        if !agrees {
            if (self.current_iv - rank.current_iv).abs() > 1e-12 {
                reasons.push(DivergenceReason::DifferentCurrentIv {
                    threshold_iv: self.current_iv,
                    rank_iv: rank.current_iv,
                });
            }
            if self.sample_size != rank.sample_size {
                reasons.push(DivergenceReason::DifferentSampleWindow {
                    threshold_samples: self.sample_size,
                    rank_samples: rank.sample_size,
                });
            }
            if self.method == ThresholdMethod::StaticFallback {
                reasons.push(DivergenceReason::StaticFallbackThresholds);
            }
            if self.data_quality.is_degraded() || rank.data_quality.is_degraded() {
                reasons.push(DivergenceReason::LowConfidence);
            }
            reasons.push(DivergenceReason::ThresholdingMethod);

            tracing::debug!(
                "IV threshold says {} but rank {:.1} says {}",
                self.status,
                rank.iv_rank,
                rank.rank_status
            );
        }

        CrossValidation {
            threshold_status: self.status,
            rank_status: rank.rank_status,
            iv_rank: rank.iv_rank,
            agrees,
            reasons,
        }
    }

    /// Attach a cross-validation verdict, leaving `status` untouched
    pub fn with_cross_validation(mut self, rank: &VolatilityRankResult) -> Self {
        self.cross_validation = Some(self.cross_validate(rank));
        self
    }

    /// Width of the NORMAL band
    pub fn band_width(&self) -> f64 {
        self.high_threshold - self.low_threshold
    }

    /// Current IV lies within `margin_fraction` of the band width of either threshold
    pub fn near_threshold(&self, margin_fraction: f64) -> bool {
        let margin = margin_fraction * self.band_width();
        (self.current_iv - self.high_threshold).abs() <= margin
            || (self.current_iv - self.low_threshold).abs() <= margin
    }
}

/// Classify `current_iv` as LOW / NORMAL / HIGH against its history.
///
/// Never fails for a short or empty history (that selects the static
/// fallback); fails with `InvalidInput` for a non-positive current IV and
/// with `Config` for an invalid configuration.
pub fn classify_iv(
    current_iv: f64,
    history: &[f64],
    config: &ThresholdConfig,
) -> AnalyticsResult<IVThresholdResult> {
    config.validate()?;
    ensure_positive(current_iv, "current IV")?;

    let (sorted, dropped) = clean_sorted(history);
    if dropped > 0 {
        tracing::warn!("IV thresholds: dropped {} invalid history samples", dropped);
    }

    let sample_size = sorted.len();
    let data_quality = DataQuality::from_sample_size(
        sample_size,
        config.sufficient_samples,
        config.limited_samples,
    );

    let percentile_band = match data_quality {
        DataQuality::Insufficient => None,
        _ => percentile(&sorted, config.low_percentile)
            .zip(percentile(&sorted, config.high_percentile)),
    };

    let (low_threshold, high_threshold, method) = match percentile_band {
        Some((low, high)) => (low, high, ThresholdMethod::Percentile),
        None => {
            tracing::warn!(
                "IV thresholds: {} history samples ({} needed), using static thresholds around {:.2}",
                sample_size,
                config.limited_samples,
                config.reference_volatility
            );
            (
                config.reference_volatility * config.static_low_multiplier,
                config.reference_volatility * config.static_high_multiplier,
                ThresholdMethod::StaticFallback,
            )
        }
    };

    let status = if current_iv > high_threshold {
        VolatilityStatus::High
    } else if current_iv < low_threshold {
        VolatilityStatus::Low
    } else {
        VolatilityStatus::Normal
    };

    let mut result = IVThresholdResult {
        current_iv,
        low_threshold,
        high_threshold,
        status,
        method,
        data_quality,
        sample_size,
        boundary_warning: false,
        cross_validation: None,
    };
    result.boundary_warning = result.near_threshold(config.boundary_margin);
    if result.boundary_warning {
        tracing::debug!(
            "IV {:.4} within {:.4} of a threshold ({:.4} / {:.4})",
            current_iv,
            config.boundary_margin * result.band_width(),
            low_threshold,
            high_threshold
        );
    }

    Ok(result)
}

/// Classify against a timestamped IV history
pub fn classify_iv_series(
    current_iv: f64,
    history: &TimeSeries,
    config: &ThresholdConfig,
) -> AnalyticsResult<IVThresholdResult> {
    classify_iv(current_iv, &history.values(), config)
}
