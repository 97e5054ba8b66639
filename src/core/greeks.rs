//! Option Greeks
//!
//! First order sensitivities plus gamma, in the units the Greeks engine returns:
//!
//! - theta is annualized (per year of calendar time); divide by
//!   [`THETA_DAYS_PER_YEAR`] or call [`Greeks::theta_per_day`] for a daily figure
//! - vega is per unit change in volatility (0.20 -> 1.20); per 1 vol point
//!   is [`Greeks::vega_per_vol_point`]
//! - rho is per unit change in the rate; per 1% is [`Greeks::rho_per_rate_point`]

use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// Calendar days used to turn annualized theta into a daily figure
pub const THETA_DAYS_PER_YEAR: f64 = 365.0;

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Which contract these sensitivities belong to
    pub option_type: OptionType,
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (identical for calls and puts)
    pub gamma: f64,
    /// Theta: dV/dt, annualized
    pub theta: f64,
    /// Vega: dV/dσ, per unit volatility
    pub vega: f64,
    /// Rho: dV/dr, per unit rate
    pub rho: f64,
}

impl Greeks {
    pub fn theta_per_day(&self) -> f64 {
        self.theta / THETA_DAYS_PER_YEAR
    }

    /// Price change for a one point (0.01) move in volatility
    pub fn vega_per_vol_point(&self) -> f64 {
        self.vega / 100.0
    }

    /// Price change for a one percent (0.01) move in the rate
    pub fn rho_per_rate_point(&self) -> f64 {
        self.rho / 100.0
    }

    /// Scale Greeks by a factor (e.g., quantity times contract multiplier)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            option_type: self.option_type,
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }

    /// Add two Greeks (for a position); keeps this side's option type
    pub fn add(&self, other: &Greeks) -> Self {
        Self {
            option_type: self.option_type,
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}
