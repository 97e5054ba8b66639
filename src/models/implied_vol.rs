//! Implied volatility solver
//!
//! Newton-Raphson on the Black-Scholes price with a bisection fallback.
//!
//! Newton runs from [`SolverConfig::initial_guess`] until the price error drops
//! below tolerance. When vega gets too flat or an iterate leaves
//! `[vol_lower_bound, vol_upper_bound]`, the solver switches to bisection on
//! that bracket. Bisection only starts if the bracket contains the target
//! price.
//!
//! Failing to converge is a normal outcome for illiquid or off-market quotes.
//! It is reported through [`IVSolveStatus`], never as an error. Errors are
//! reserved for invalid inputs.

use serde::{Deserialize, Serialize};

use crate::core::{
    ensure_positive, AnalyticsResult, MarketSnapshot, OptionType, SolverConfig,
};

use super::black_scholes::price_snapshot;
use super::greeks::vega_from_d1;

/// Terminal state of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IVSolveStatus {
    /// Price error fell below tolerance
    Converged,
    /// Iteration budget spent without reaching tolerance
    MaxIterExceeded,
    /// Market price lies outside [price(lower), price(upper)]
    BracketInvalid,
}

/// Outcome of an implied volatility solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IVSolveResult {
    pub option_type: OptionType,
    /// Solved volatility, or the best estimate when not converged.
    /// For an invalid bracket this is the bound nearest the target price.
    pub implied_volatility: f64,
    pub converged: bool,
    /// Newton plus bisection iterations
    pub iterations: usize,
    /// Whether the bisection fallback ran (or was attempted)
    pub bracket_used: bool,
    pub status: IVSolveStatus,
    /// |model price - market price| at `implied_volatility`.
    ///
    /// Convergence is judged on this price error, not on the volatility. The
    /// vol error is roughly `price_error / vega`, so where vega is flat (deep
    /// in the money, very short dated) a converged solve can still sit well
    /// away from the volatility that generated the price.
    pub price_error: f64,
}

impl IVSolveResult {
    pub fn bracket_invalid(&self) -> bool {
        self.status == IVSolveStatus::BracketInvalid
    }

    /// The solved volatility, only when the solve converged
    pub fn vol(&self) -> Option<f64> {
        self.converged.then_some(self.implied_volatility)
    }
}

/// Solve with the default [`SolverConfig`]
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    option_type: OptionType,
) -> AnalyticsResult<IVSolveResult> {
    solve_implied_volatility(
        market_price,
        spot,
        strike,
        rate,
        div,
        time,
        option_type,
        &SolverConfig::default(),
    )
}

/// Recover the volatility that reprices `market_price`.
///
/// Fails with `InvalidInput` for a non-positive market price, spot, strike or
/// time, and with `Config` for an invalid solver configuration. Every other
/// outcome is an `Ok` result whose `status` says how the search ended.
#[allow(clippy::too_many_arguments)]
pub fn solve_implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    option_type: OptionType,
    config: &SolverConfig,
) -> AnalyticsResult<IVSolveResult> {
    config.validate()?;
    ensure_positive(market_price, "market price")?;

    let initial = config
        .initial_guess
        .clamp(config.vol_lower_bound, config.vol_upper_bound);
    let snapshot =
        MarketSnapshot::new(spot, strike, rate, time, initial)?.with_dividend_yield(div)?;

    let solver = Solver {
        snapshot,
        option_type,
        market_price,
        config,
    };
    Ok(solver.run())
}

struct Solver<'a> {
    snapshot: MarketSnapshot,
    option_type: OptionType,
    market_price: f64,
    config: &'a SolverConfig,
}

/// How the Newton phase ended
enum NewtonOutcome {
    Done(IVSolveResult),
    Fallback { iterations: usize },
}

impl Solver<'_> {
    fn run(&self) -> IVSolveResult {
        match self.newton() {
            NewtonOutcome::Done(result) => result,
            NewtonOutcome::Fallback { iterations } => self.bisection(iterations),
        }
    }

    /// Price error (model - market) at `vol`, plus d1 for the Newton step
    fn error_at(&self, vol: f64) -> (f64, f64) {
        let mut trial = self.snapshot;
        trial.vol = vol;
        let pricing = price_snapshot(&trial, self.option_type);
        (pricing.price - self.market_price, pricing.d1)
    }

    fn vega_at(&self, vol: f64, d1: f64) -> f64 {
        let mut trial = self.snapshot;
        trial.vol = vol;
        vega_from_d1(&trial, d1)
    }

    fn finish(
        &self,
        vol: f64,
        error: f64,
        iterations: usize,
        bracket_used: bool,
        status: IVSolveStatus,
    ) -> IVSolveResult {
        IVSolveResult {
            option_type: self.option_type,
            implied_volatility: vol,
            converged: status == IVSolveStatus::Converged,
            iterations,
            bracket_used,
            status,
            price_error: error.abs(),
        }
    }

    fn newton(&self) -> NewtonOutcome {
        let cfg = self.config;
        let mut vol = self.snapshot.vol;
        let mut last_error = f64::INFINITY;

        for iteration in 1..=cfg.max_iterations {
            let (error, d1) = self.error_at(vol);
            last_error = error;

            if error.abs() < cfg.tolerance {
                return NewtonOutcome::Done(self.finish(
                    vol,
                    error,
                    iteration,
                    false,
                    IVSolveStatus::Converged,
                ));
            }

            let vega = self.vega_at(vol, d1);
            if !(vega > cfg.vega_epsilon) {
                tracing::debug!(
                    "IV Newton: vega {:.3e} below epsilon at vol {:.4}, switching to bisection",
                    vega,
                    vol
                );
                return NewtonOutcome::Fallback {
                    iterations: iteration,
                };
            }

            let next = vol - error / vega;
            if !next.is_finite() || next < cfg.vol_lower_bound || next > cfg.vol_upper_bound {
                tracing::debug!(
                    "IV Newton: step to {:.4} leaves [{}, {}], switching to bisection",
                    next,
                    cfg.vol_lower_bound,
                    cfg.vol_upper_bound
                );
                return NewtonOutcome::Fallback {
                    iterations: iteration,
                };
            }

            vol = next;
        }

        tracing::debug!(
            "IV Newton: no convergence after {} iterations (error {:.3e})",
            cfg.max_iterations,
            last_error
        );
        NewtonOutcome::Done(self.finish(
            vol,
            last_error,
            cfg.max_iterations,
            false,
            IVSolveStatus::MaxIterExceeded,
        ))
    }

    fn bisection(&self, newton_iterations: usize) -> IVSolveResult {
        let cfg = self.config;
        let mut low = cfg.vol_lower_bound;
        let mut high = cfg.vol_upper_bound;

        let (error_low, _) = self.error_at(low);
        let (error_high, _) = self.error_at(high);

        if error_low.abs() < cfg.tolerance {
            return self.finish(low, error_low, newton_iterations, true, IVSolveStatus::Converged);
        }
        if error_high.abs() < cfg.tolerance {
            return self.finish(high, error_high, newton_iterations, true, IVSolveStatus::Converged);
        }

        // Price is increasing in vol, so the target must sit between the ends
        if !(error_low <= 0.0 && error_high >= 0.0) {
            tracing::debug!(
                "IV bisection: market price {:.4} outside bracket prices [{:.4}, {:.4}]",
                self.market_price,
                error_low + self.market_price,
                error_high + self.market_price
            );
            let (vol, error) = if error_low > 0.0 {
                (low, error_low)
            } else {
                (high, error_high)
            };
            return self.finish(vol, error, newton_iterations, true, IVSolveStatus::BracketInvalid);
        }

        let mut mid = 0.5 * (low + high);
        let mut error = f64::INFINITY;

        for iteration in 1..=cfg.max_iterations {
            mid = 0.5 * (low + high);
            (error, _) = self.error_at(mid);

            if error.abs() < cfg.tolerance {
                return self.finish(
                    mid,
                    error,
                    newton_iterations + iteration,
                    true,
                    IVSolveStatus::Converged,
                );
            }

            if error > 0.0 {
                high = mid;
            } else {
                low = mid;
            }
        }

        self.finish(
            mid,
            error,
            newton_iterations + cfg.max_iterations,
            true,
            IVSolveStatus::MaxIterExceeded,
        )
    }
}
