//! Pricing Models
//!
//! Implements:
//! - Black-Scholes closed-form pricing (the d1/d2 source of truth)
//! - Analytic Greeks on the same d1/d2
//! - Implied volatility (Newton-Raphson with bisection fallback)
//! - Chain analytics (IV and Greeks across a quote chain)

pub mod black_scholes;
pub mod chain;
pub mod greeks;
pub mod implied_vol;

pub use black_scholes::*;
pub use chain::*;
pub use greeks::*;
pub use implied_vol::*;
