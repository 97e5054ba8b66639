//! Option contract inputs
//!
//! Contract direction and the market snapshot every pricing call runs against.

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, ensure_non_negative, ensure_positive, AnalyticsResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

/// Market inputs for one contract's analysis run.
///
/// Fields are public for the rendering layer; every engine calls
/// [`MarketSnapshot::validate`] before using them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Underlying spot price (> 0)
    pub spot: f64,
    /// Strike price (> 0)
    pub strike: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Time to expiry in years (> 0)
    pub time: f64,
    /// Volatility estimate (> 0)
    pub vol: f64,
    /// Continuous dividend yield, zero when the underlying pays none
    #[serde(default)]
    pub dividend_yield: f64,
}

impl MarketSnapshot {
    /// Validated snapshot without dividends.
    ///
    /// Takes `time` before `vol`; the free pricing functions
    /// ([`crate::models::price`], [`crate::models::greeks`]) take `vol` before `time`.
    pub fn new(spot: f64, strike: f64, rate: f64, time: f64, vol: f64) -> AnalyticsResult<Self> {
        let snapshot = Self {
            spot,
            strike,
            rate,
            time,
            vol,
            dividend_yield: 0.0,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> AnalyticsResult<Self> {
        self.dividend_yield = dividend_yield;
        self.validate()?;
        Ok(self)
    }

    /// Same contract at a different volatility
    pub fn with_vol(mut self, vol: f64) -> AnalyticsResult<Self> {
        self.vol = vol;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive(self.spot, "spot")?;
        ensure_positive(self.strike, "strike")?;
        ensure_finite(self.rate, "rate")?;
        ensure_positive(self.time, "time to expiry")?;
        ensure_positive(self.vol, "volatility")?;
        ensure_non_negative(self.dividend_yield, "dividend yield")?;
        Ok(())
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time).exp()
    }

    /// e^(-qT)
    pub fn dividend_factor(&self) -> f64 {
        (-self.dividend_yield * self.time).exp()
    }

    /// Forward price: S * e^((r - q)T)
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend_yield) * self.time).exp()
    }

    /// Present value of dividends paid over the option's life: S * (1 - e^(-qT))
    pub fn dividend_pv(&self) -> f64 {
        continuous_dividend_pv(self.spot, self.dividend_yield, self.time)
    }
}

/// Present value of a continuous dividend yield `q` paid over `time` years:
/// S * (1 - e^(-qT))
pub fn continuous_dividend_pv(spot: f64, dividend_yield: f64, time: f64) -> f64 {
    spot * (1.0 - (-dividend_yield * time).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_snapshot_rejects_bad_inputs() {
        assert!(MarketSnapshot::new(0.0, 100.0, 0.05, 1.0, 0.2).is_err());
        assert!(MarketSnapshot::new(100.0, -1.0, 0.05, 1.0, 0.2).is_err());
        assert!(MarketSnapshot::new(100.0, 100.0, 0.05, 0.0, 0.2).is_err());
        assert!(MarketSnapshot::new(100.0, 100.0, 0.05, 1.0, 0.0).is_err());
        assert!(MarketSnapshot::new(100.0, 100.0, f64::NAN, 1.0, 0.2).is_err());

        // Negative rates are legitimate
        assert!(MarketSnapshot::new(100.0, 100.0, -0.005, 1.0, 0.2).is_ok());
    }

    #[test]
    fn test_dividend_helpers() {
        let snap = MarketSnapshot::new(100.0, 100.0, 0.05, 1.0, 0.2).unwrap();
        assert_eq!(snap.dividend_pv(), 0.0);
        assert!((snap.forward() - 100.0 * 0.05_f64.exp()).abs() < 1e-12);

        let snap = snap.with_dividend_yield(0.02).unwrap();
        let expected_pv = 100.0 * (1.0 - (-0.02_f64).exp());
        assert!((snap.dividend_pv() - expected_pv).abs() < 1e-12);
        assert!(snap.with_dividend_yield(-0.01).is_err());
    }

    #[test]
    fn test_snapshot_deserializes_without_dividend() {
        let json = r#"{"spot":100.0,"strike":95.0,"rate":0.05,"time":0.5,"vol":0.25}"#;
        let snap: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.dividend_yield, 0.0);
        assert!(snap.validate().is_ok());
    }
}
