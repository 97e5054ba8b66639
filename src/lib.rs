//! # Options Analytics - Pricing and Volatility Engine
//!
//! Closed-form option pricing and volatility statistics for a retail
//! options-analysis toolkit.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: call/put prices and the d1/d2 intermediates
//! - **Greeks**: delta, gamma, theta, vega, rho on the same d1/d2
//! - **Implied Volatility**: Newton-Raphson with a bisection fallback;
//!   non-convergence is a result state, not an error
//! - **Historical Volatility**: rolling-window realized volatility
//! - **IV Rank**: rank and percentile of current IV against its history
//! - **Dynamic Thresholds**: percentile-band LOW / NORMAL / HIGH
//!   classification, cross-validated against the rank
//! - **Put-Call Parity**: arbitrage checks on quoted and model prices
//!
//! ## Usage
//!
//! ```rust
//! use options_analytics::prelude::*;
//!
//! let call = bs_price(100.0, 100.0, 0.05, 0.0, 0.20, 1.0, OptionType::Call).unwrap();
//! assert!((call.price - 10.45).abs() < 0.01);
//!
//! let iv = implied_volatility(11.0, 100.0, 100.0, 0.05, 0.0, 1.0, OptionType::Call).unwrap();
//! assert!(iv.converged && iv.implied_volatility > 0.20);
//! ```
//!
//! ## Conventions
//!
//! - Dividends are a continuous yield `q` everywhere (see
//!   [`models::black_scholes`]); parity takes their present value
//! - Vega is per unit volatility, theta is annualized, rho is per unit rate;
//!   see [`core::Greeks`] for the conversions
//!
//! Every function is pure over its inputs and holds no state, so calls can be
//! dispatched across threads freely.

pub mod arbitrage;
pub mod core;
pub mod models;
pub mod volatility;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AnalyticsConfig, AnalyticsError, AnalyticsResult, Greeks, HistoricalVolConfig,
        MarketSnapshot, Observation, OptionQuote, OptionType, ParityConfig, QuoteChain,
        RankConfig, SolverConfig, ThresholdConfig, TimeSeries,
    };

    // Models
    pub use crate::models::{
        analyze_chain,
        greeks as bs_greeks,
        greeks_pair,
        greeks_snapshot,
        implied_volatility,
        norm_cdf,
        norm_pdf,
        // Black-Scholes
        price as bs_price,
        price_snapshot,
        solve_implied_volatility,
        ContractAnalytics,
        IVSolveResult,
        IVSolveStatus,
        PricingResult,
    };

    // Volatility statistics
    pub use crate::volatility::{
        classify_iv, compare_iv_to_hv, historical_volatility, historical_volatility_multi,
        historical_volatility_with_config, volatility_rank, CrossValidation, DataQuality,
        DivergenceReason, IVThresholdResult, RankWarning, ThresholdMethod, VolatilityRankResult,
        VolatilityStatus, VolatilityWindowResult,
    };

    // Parity
    pub use crate::arbitrage::{
        parity_by_strike, parity_report, parity_with_theoretical_prices, put_call_parity,
        ParityReport, ParityResult, ParitySource, ParityStrategy,
    };
}

// Re-export main types at crate root
pub use crate::core::{AnalyticsError, AnalyticsResult, MarketSnapshot, OptionType};
