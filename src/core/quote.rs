//! Option quote data
//!
//! Observed market prices for single contracts and for a one-expiry chain.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, ensure_non_negative, ensure_positive, AnalyticsResult};
use super::option::{continuous_dividend_pv, MarketSnapshot, OptionType};

/// Minimum open interest for a quote to count as liquid
pub const MIN_LIQUID_OPEN_INTEREST: u64 = 10;

/// Maximum relative spread (spread / mid) for a quote to count as liquid
pub const MAX_LIQUID_RELATIVE_SPREAD: f64 = 0.5;

/// Option market quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
    /// Last traded (observed market) price
    pub last: Option<f64>,
    /// Bid price
    pub bid: Option<f64>,
    /// Ask price
    pub ask: Option<f64>,
    /// Trading volume
    pub volume: Option<u64>,
    /// Open interest
    pub open_interest: Option<u64>,
    /// Quote timestamp
    pub timestamp: DateTime<Utc>,
}

impl OptionQuote {
    pub fn new(option_type: OptionType, strike: f64) -> Self {
        Self {
            option_type,
            strike,
            last: None,
            bid: None,
            ask: None,
            volume: None,
            open_interest: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_bid_ask(mut self, bid: f64, ask: f64) -> Self {
        self.bid = Some(bid);
        self.ask = Some(ask);
        self
    }

    pub fn with_last(mut self, last: f64) -> Self {
        self.last = Some(last);
        self
    }

    /// Mid price, only when both sides are quoted and not crossed
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) if a >= b => Some((b + a) / 2.0),
            _ => None,
        }
    }

    /// Get the best available price (mid > last > bid)
    pub fn best_price(&self) -> Option<f64> {
        self.mid()
            .or(self.last)
            .or(self.bid)
            .filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Bid-ask spread
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) => Some(a - b),
            _ => None,
        }
    }

    /// Relative spread (spread / mid)
    pub fn relative_spread(&self) -> Option<f64> {
        match (self.spread(), self.mid()) {
            (Some(s), Some(m)) if m > 0.0 => Some(s / m),
            _ => None,
        }
    }

    /// Two-sided, reasonably tight and with some open interest
    pub fn is_liquid(&self) -> bool {
        let reasonable_spread = self
            .relative_spread()
            .map(|s| s < MAX_LIQUID_RELATIVE_SPREAD)
            .unwrap_or(false);
        let has_interest = self
            .open_interest
            .map(|oi| oi > MIN_LIQUID_OPEN_INTEREST)
            .unwrap_or(true);

        reasonable_spread && has_interest && self.best_price().is_some()
    }
}

/// Chain of quotes for a single expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteChain {
    /// Underlying symbol
    pub underlying: String,
    /// Underlying spot price
    pub spot: f64,
    /// Expiry date
    pub expiry: NaiveDate,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Risk-free rate used
    pub risk_free_rate: f64,
    /// Continuous dividend yield used
    pub dividend_yield: f64,
    /// Call quotes sorted by strike
    pub calls: Vec<OptionQuote>,
    /// Put quotes sorted by strike
    pub puts: Vec<OptionQuote>,
}

impl QuoteChain {
    /// Time to expiry is measured from `as_of` in ACT/365.
    pub fn new(
        underlying: impl Into<String>,
        spot: f64,
        expiry: NaiveDate,
        as_of: NaiveDate,
        risk_free_rate: f64,
    ) -> AnalyticsResult<Self> {
        ensure_positive(spot, "spot")?;
        ensure_finite(risk_free_rate, "risk-free rate")?;
        let days = (expiry - as_of).num_days();
        let time_to_expiry = ensure_positive(days as f64 / 365.0, "time to expiry")?;

        Ok(Self {
            underlying: underlying.into(),
            spot,
            expiry,
            time_to_expiry,
            risk_free_rate,
            dividend_yield: 0.0,
            calls: Vec::new(),
            puts: Vec::new(),
        })
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> AnalyticsResult<Self> {
        self.dividend_yield = ensure_non_negative(dividend_yield, "dividend yield")?;
        Ok(self)
    }

    /// Add a quote to the side matching its option type, keeping strikes sorted
    pub fn add_quote(&mut self, quote: OptionQuote) {
        let side = match quote.option_type {
            OptionType::Call => &mut self.calls,
            OptionType::Put => &mut self.puts,
        };
        side.push(quote);
        side.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Get all strikes
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .calls
            .iter()
            .map(|q| q.strike)
            .chain(self.puts.iter().map(|q| q.strike))
            .collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();
        strikes
    }

    /// Get ATM strike (closest to spot)
    pub fn atm_strike(&self) -> Option<f64> {
        self.strikes()
            .into_iter()
            .min_by(|a, b| (self.spot - a).abs().total_cmp(&(self.spot - b).abs()))
    }

    /// Get call quote at strike
    pub fn call_at(&self, strike: f64) -> Option<&OptionQuote> {
        self.calls.iter().find(|q| (q.strike - strike).abs() < 0.01)
    }

    /// Get put quote at strike
    pub fn put_at(&self, strike: f64) -> Option<&OptionQuote> {
        self.puts.iter().find(|q| (q.strike - strike).abs() < 0.01)
    }

    /// Market snapshot for one strike of this chain at the given volatility
    pub fn snapshot_for(&self, strike: f64, vol: f64) -> AnalyticsResult<MarketSnapshot> {
        MarketSnapshot::new(
            self.spot,
            strike,
            self.risk_free_rate,
            self.time_to_expiry,
            vol,
        )?
        .with_dividend_yield(self.dividend_yield)
    }

    /// Present value of the chain's continuous dividend yield to expiry
    pub fn dividend_pv(&self) -> f64 {
        continuous_dividend_pv(self.spot, self.dividend_yield, self.time_to_expiry)
    }

    /// Total number of quotes
    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
