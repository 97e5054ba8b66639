//! No-arbitrage consistency checks
//!
//! Put-call parity on quoted prices, on model prices, and across a chain.

mod parity;

pub use parity::*;
