//! Configuration for the analytics engines
//!
//! Every business constant used by the solver and the volatility statistics
//! lives here with its default. Configs deserialize from JSON with missing
//! fields falling back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{AnalyticsError, AnalyticsResult};

/// One trading year of daily observations
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Full configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Implied volatility root-finder
    pub solver: SolverConfig,
    /// Realized volatility
    pub historical: HistoricalVolConfig,
    /// IV rank / percentile
    pub rank: RankConfig,
    /// Dynamic IV thresholds
    pub threshold: ThresholdConfig,
    /// Put-call parity
    pub parity: ParityConfig,
}

impl AnalyticsConfig {
    pub fn from_json_str(json: &str) -> AnalyticsResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalyticsError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> AnalyticsResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!("Loaded analytics config from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn to_json_string(&self) -> AnalyticsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AnalyticsError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        self.solver.validate()?;
        self.historical.validate()?;
        self.rank.validate()?;
        self.threshold.validate()?;
        self.parity.validate()?;
        Ok(())
    }
}

/// Implied volatility solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Starting volatility for Newton iteration
    /// Default: 0.30
    pub initial_guess: f64,

    /// Stop when |model price - market price| < tolerance
    /// Default: 1e-4
    pub tolerance: f64,

    /// Iteration cap, applied separately to the Newton and bisection phases
    /// Default: 100
    pub max_iterations: usize,

    /// Lower end of the sane volatility range and bisection bracket
    /// Default: 0.001
    pub vol_lower_bound: f64,

    /// Upper end of the sane volatility range and bisection bracket
    /// Default: 5.0
    pub vol_upper_bound: f64,

    /// Vega below this makes the Newton step unreliable; switch to bisection
    /// Default: 1e-8
    pub vega_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.30,
            tolerance: 1e-4,
            max_iterations: 100,
            vol_lower_bound: 0.001,
            vol_upper_bound: 5.0,
            vega_epsilon: 1e-8,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.vol_lower_bound > 0.0 && self.vol_lower_bound < self.vol_upper_bound)
            || !self.vol_upper_bound.is_finite()
        {
            return Err(AnalyticsError::config(format!(
                "solver bracket must satisfy 0 < lower < upper, got [{}, {}]",
                self.vol_lower_bound, self.vol_upper_bound
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(AnalyticsError::config("solver tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(AnalyticsError::config("solver needs at least one iteration"));
        }
        if !(self.vega_epsilon >= 0.0) {
            return Err(AnalyticsError::config("vega epsilon must be non-negative"));
        }
        if !self.initial_guess.is_finite() {
            return Err(AnalyticsError::config("initial guess must be finite"));
        }
        Ok(())
    }
}

/// Realized volatility configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalVolConfig {
    /// Annualization factor applied as sqrt(trading_days_per_year)
    /// Default: 252
    pub trading_days_per_year: f64,

    /// Windows computed by default, in trading days
    /// Default: [10, 20, 30, 60, 90]
    pub default_windows: Vec<usize>,
}

impl Default for HistoricalVolConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            default_windows: vec![10, 20, 30, 60, 90],
        }
    }
}

impl HistoricalVolConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.trading_days_per_year > 0.0 && self.trading_days_per_year.is_finite()) {
            return Err(AnalyticsError::config(
                "trading days per year must be positive",
            ));
        }
        if self.default_windows.iter().any(|&w| w < 2) {
            return Err(AnalyticsError::config(
                "volatility windows need at least 2 returns",
            ));
        }
        Ok(())
    }
}

/// IV rank / percentile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// History length for full confidence (one trading year)
    /// Default: 252
    pub sufficient_samples: usize,

    /// History length below which results are insufficient (half a year)
    /// Default: 126
    pub limited_samples: usize,

    /// Rank below this maps to LOW when cross-validating
    /// Default: 30
    pub low_rank_cutoff: f64,

    /// Rank above this maps to HIGH when cross-validating
    /// Default: 70
    pub high_rank_cutoff: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            sufficient_samples: 252,
            limited_samples: 126,
            low_rank_cutoff: 30.0,
            high_rank_cutoff: 70.0,
        }
    }
}

impl RankConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        validate_sample_tiers(self.sufficient_samples, self.limited_samples)?;
        if !(0.0 <= self.low_rank_cutoff
            && self.low_rank_cutoff < self.high_rank_cutoff
            && self.high_rank_cutoff <= 100.0)
        {
            return Err(AnalyticsError::config(format!(
                "rank cutoffs must satisfy 0 <= low < high <= 100, got {} / {}",
                self.low_rank_cutoff, self.high_rank_cutoff
            )));
        }
        Ok(())
    }
}

/// Dynamic IV threshold configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Percentile of history used as the LOW threshold
    /// Default: 25
    pub low_percentile: f64,

    /// Percentile of history used as the HIGH threshold
    /// Default: 75
    pub high_percentile: f64,

    /// Boundary warning fires within this fraction of the threshold band
    /// of either threshold
    /// Default: 0.10
    pub boundary_margin: f64,

    /// History length for full confidence
    /// Default: 252
    pub sufficient_samples: usize,

    /// History length below which percentile thresholds are abandoned
    /// Default: 126
    pub limited_samples: usize,

    /// Reference volatility for the static fallback thresholds
    /// Default: 0.20
    pub reference_volatility: f64,

    /// LOW threshold = reference_volatility * this when history is insufficient
    /// Default: 0.8
    pub static_low_multiplier: f64,

    /// HIGH threshold = reference_volatility * this when history is insufficient
    /// Default: 1.2
    pub static_high_multiplier: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            low_percentile: 25.0,
            high_percentile: 75.0,
            boundary_margin: 0.10,
            sufficient_samples: 252,
            limited_samples: 126,
            reference_volatility: 0.20,
            static_low_multiplier: 0.8,
            static_high_multiplier: 1.2,
        }
    }
}

impl ThresholdConfig {
    /// Tighter band: more contracts classified HIGH or LOW
    pub fn narrow() -> Self {
        Self {
            low_percentile: 35.0,
            high_percentile: 65.0,
            static_low_multiplier: 0.9,
            static_high_multiplier: 1.1,
            ..Default::default()
        }
    }

    /// Wider band: only clear extremes leave NORMAL
    pub fn wide() -> Self {
        Self {
            low_percentile: 10.0,
            high_percentile: 90.0,
            static_low_multiplier: 0.7,
            static_high_multiplier: 1.3,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        validate_sample_tiers(self.sufficient_samples, self.limited_samples)?;
        if !(0.0 <= self.low_percentile
            && self.low_percentile < self.high_percentile
            && self.high_percentile <= 100.0)
        {
            return Err(AnalyticsError::config(format!(
                "threshold percentiles must satisfy 0 <= low < high <= 100, got {} / {}",
                self.low_percentile, self.high_percentile
            )));
        }
        if !(self.boundary_margin >= 0.0 && self.boundary_margin < 0.5) {
            return Err(AnalyticsError::config(
                "boundary margin must be in [0, 0.5)",
            ));
        }
        if !(self.reference_volatility > 0.0 && self.reference_volatility.is_finite()) {
            return Err(AnalyticsError::config(
                "reference volatility must be positive",
            ));
        }
        if !(0.0 < self.static_low_multiplier
            && self.static_low_multiplier < self.static_high_multiplier)
        {
            return Err(AnalyticsError::config(
                "static multipliers must satisfy 0 < low < high",
            ));
        }
        Ok(())
    }
}

/// Put-call parity configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityConfig {
    /// Round-trip cost of the conversion/reversal, per share
    /// Default: 0.0
    pub transaction_cost: f64,
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            transaction_cost: 0.0,
        }
    }
}

impl ParityConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.transaction_cost >= 0.0 && self.transaction_cost.is_finite()) {
            return Err(AnalyticsError::config(
                "transaction cost must be non-negative",
            ));
        }
        Ok(())
    }
}

fn validate_sample_tiers(sufficient: usize, limited: usize) -> AnalyticsResult<()> {
    if limited == 0 || limited > sufficient {
        return Err(AnalyticsError::config(format!(
            "sample tiers must satisfy 0 < limited <= sufficient, got {limited} / {sufficient}"
        )));
    }
    Ok(())
}
