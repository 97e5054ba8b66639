//! Timestamped historical series
//!
//! Price or IV history handed to the volatility engines. Observations are kept
//! in strictly increasing timestamp order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{AnalyticsError, AnalyticsResult};

/// One `(timestamp, value)` sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Ordered historical series (oldest first)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Fails with `InvalidInput` when timestamps are not strictly increasing.
    pub fn new(observations: Vec<Observation>) -> AnalyticsResult<Self> {
        if let Some(idx) = observations
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(AnalyticsError::invalid_input(format!(
                "series timestamps must be strictly increasing (at index {})",
                idx + 1
            )));
        }
        Ok(Self { observations })
    }

    /// Build from unordered samples by sorting on timestamp. Duplicate
    /// timestamps are still rejected.
    pub fn from_unsorted(mut observations: Vec<Observation>) -> AnalyticsResult<Self> {
        observations.sort_by_key(|o| o.timestamp);
        Self::new(observations)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Values in time order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
