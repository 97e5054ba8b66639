//! Core data types for options analytics
//!
//! Defines fundamental types:
//! - OptionType / MarketSnapshot: contract direction and market inputs
//! - OptionQuote / QuoteChain: observed market prices
//! - Greeks: sensitivities and their unit conventions
//! - TimeSeries: ordered price or IV history
//! - AnalyticsConfig: engine constants

pub mod config;
pub mod error;
pub mod greeks;
pub mod option;
pub mod quote;
pub mod series;

pub use config::*;
pub use error::*;
pub use greeks::*;
pub use option::*;
pub use quote::*;
pub use series::*;
