//! Volatility statistics over historical series
//!
//! - **Historical (realized) volatility**: annualized stdev of log returns over
//!   trailing windows
//! - **IV rank / percentile**: where current IV sits in its trailing history
//! - **Dynamic IV thresholds**: percentile bands classifying IV as LOW / NORMAL /
//!   HIGH, cross-validated against the rank
//!
//! Short histories degrade to a lower [`DataQuality`] tier instead of failing,
//! except for a realized-vol window that lacks the prices it needs.

mod historical;
mod rank;
mod stats;
mod threshold;

pub use historical::*;
pub use rank::*;
pub use threshold::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistical confidence of a history-based result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataQuality {
    /// Below the limited tier: treat results as indicative only
    Insufficient,
    /// Usable but shorter than the full sample
    Limited,
    /// Full sample available
    Sufficient,
}

impl DataQuality {
    /// Tier for `available` samples given the sufficient and limited cut-offs
    pub fn from_sample_size(available: usize, sufficient: usize, limited: usize) -> Self {
        if available >= sufficient {
            DataQuality::Sufficient
        } else if available >= limited {
            DataQuality::Limited
        } else {
            DataQuality::Insufficient
        }
    }

    pub fn is_degraded(&self) -> bool {
        *self != DataQuality::Sufficient
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataQuality::Sufficient => "sufficient",
            DataQuality::Limited => "limited",
            DataQuality::Insufficient => "insufficient",
        }
    }
}

/// Relative level of implied volatility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityStatus {
    Low,
    Normal,
    High,
}

impl VolatilityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VolatilityStatus::Low => "LOW",
            VolatilityStatus::Normal => "NORMAL",
            VolatilityStatus::High => "HIGH",
        }
    }
}

impl fmt::Display for VolatilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
