//! Chain analytics
//!
//! Implied volatility and Greeks for every quote of a one-expiry chain. Each
//! contract is independent, so the chain is processed in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{Greeks, OptionQuote, OptionType, QuoteChain, SolverConfig};

use super::black_scholes::{lower_bound, upper_bound};
use super::greeks::greeks_snapshot;
use super::implied_vol::{solve_implied_volatility, IVSolveResult};

/// Analytics for one quoted contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAnalytics {
    pub option_type: OptionType,
    pub strike: f64,
    /// Price the IV was solved from (mid > last > bid)
    pub market_price: Option<f64>,
    /// Solver outcome; `None` when there was no usable price or the inputs
    /// were rejected
    pub iv: Option<IVSolveResult>,
    /// Greeks at the solved vol; `None` unless the solve converged
    pub greeks: Option<Greeks>,
    /// Market price sits outside the European no-arbitrage bounds
    pub outside_bounds: bool,
}

impl ContractAnalytics {
    pub fn implied_vol(&self) -> Option<f64> {
        self.iv.as_ref().and_then(IVSolveResult::vol)
    }
}

/// Solve IV and compute Greeks for every quote in the chain.
///
/// Output order is calls by strike, then puts by strike. Quotes that cannot be
/// analysed are kept with `None` fields.
pub fn analyze_chain(chain: &QuoteChain, config: &SolverConfig) -> Vec<ContractAnalytics> {
    let results: Vec<ContractAnalytics> = chain
        .calls
        .par_iter()
        .chain(chain.puts.par_iter())
        .map(|quote| analyze_quote(chain, quote, config))
        .collect();

    let converged = results.iter().filter(|r| r.greeks.is_some()).count();
    tracing::debug!(
        "Analyzed {} chain for {}: {}/{} contracts converged",
        chain.underlying,
        chain.expiry,
        converged,
        results.len()
    );
    results
}

fn analyze_quote(
    chain: &QuoteChain,
    quote: &OptionQuote,
    config: &SolverConfig,
) -> ContractAnalytics {
    let market_price = quote.best_price();

    // Bounds do not depend on vol; any valid one builds the snapshot
    let outside_bounds = match (market_price, chain.snapshot_for(quote.strike, config.initial_guess)) {
        (Some(price), Ok(snapshot)) => {
            let lower = lower_bound(&snapshot, quote.option_type);
            let upper = upper_bound(&snapshot, quote.option_type);
            let outside = price < lower || price > upper;
            if outside {
                tracing::debug!(
                    "{} {} {} priced {:.4} outside [{:.4}, {:.4}]",
                    chain.underlying,
                    quote.strike,
                    quote.option_type.label(),
                    price,
                    lower,
                    upper
                );
            }
            outside
        }
        _ => false,
    };

    let iv = market_price.and_then(|price| {
        match solve_implied_volatility(
            price,
            chain.spot,
            quote.strike,
            chain.risk_free_rate,
            chain.dividend_yield,
            chain.time_to_expiry,
            quote.option_type,
            config,
        ) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(
                    "Skipping IV for {} {} {}: {}",
                    chain.underlying,
                    quote.strike,
                    quote.option_type.label(),
                    e
                );
                None
            }
        }
    });

    let greeks = iv
        .as_ref()
        .and_then(IVSolveResult::vol)
        .and_then(|vol| chain.snapshot_for(quote.strike, vol).ok())
        .map(|snapshot| greeks_snapshot(&snapshot, quote.option_type));

    ContractAnalytics {
        option_type: quote.option_type,
        strike: quote.strike,
        market_price,
        iv,
        greeks,
        outside_bounds,
    }
}
