//! Bet-sizing strategy family.
//!
//! Every strategy answers two questions:
//! - `evaluate`: what fraction of the bankroll to stake on the next binary
//!   trial, given a win probability and the current bankroll, and
//! - `max_entry_price`: the most it would pay up front for an arbitrary
//!   one-shot discrete gamble.
//!
//! The single invariant shared by all variants: no `evaluate` result may
//! exceed [`BetTerms::max_safe_bet`], the largest fraction that cannot
//! drive wealth negative in the worst single-trial outcome.

pub mod cppi;
pub mod dynamic;
pub mod kelly;
pub mod merton;
pub mod optimal_f;
pub mod simple;

pub use cppi::CppiStrategy;
pub use dynamic::DynamicBankrollManagement;
pub use kelly::{DrawdownAdjustedKelly, FractionalKellyCriterion, KellyCriterion};
pub use merton::MertonShare;
pub use optimal_f::OptimalF;
pub use simple::{FixedFractionStrategy, NaiveStrategy};

use crate::error::StrategyError;

use super::gamble::Gamble;
use super::utility::{DEFAULT_MAX_SEARCH_FRACTION, DEFAULT_TOLERANCE};

/// Default minimum win probability below which gated strategies sit out.
pub const DEFAULT_MIN_PROBABILITY: f64 = 0.5;

/// The economics of one binary trial, shared by every strategy variant.
///
/// `payoff` and `loss` are per-unit amounts; `transaction_cost` is charged
/// per trial regardless of outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetTerms {
    pub payoff: f64,
    pub loss: f64,
    pub transaction_cost: f64,
}

impl BetTerms {
    /// Validates the shared constraints: `payoff > 0`, `loss >= 0`,
    /// `transaction_cost >= 0`, and `loss + transaction_cost > 0` (without
    /// which the gamble has no downside and sizing is undefined).
    pub fn new(payoff: f64, loss: f64, transaction_cost: f64) -> Result<Self, StrategyError> {
        if payoff <= 0.0 || !payoff.is_finite() {
            return Err(StrategyError::invalid("Payoff must be greater than 0"));
        }
        if loss < 0.0 || !loss.is_finite() {
            return Err(StrategyError::invalid("Loss must be non-negative"));
        }
        if transaction_cost < 0.0 || !transaction_cost.is_finite() {
            return Err(StrategyError::invalid(
                "Transaction cost must be non-negative",
            ));
        }
        if loss + transaction_cost <= 0.0 {
            return Err(StrategyError::invalid(
                "Total cost (loss + transaction_cost) must be greater than 0",
            ));
        }

        Ok(Self {
            payoff,
            loss,
            transaction_cost,
        })
    }

    /// Per-trial downside per unit staked.
    pub fn total_cost(&self) -> f64 {
        self.loss + self.transaction_cost
    }

    /// Expected profit per unit staked at the given win probability.
    pub fn expected_value(&self, probability: f64) -> f64 {
        probability * self.payoff - (1.0 - probability) * self.loss - self.transaction_cost
    }

    /// The largest bankroll fraction that cannot bankrupt the bettor in a
    /// single trial: `min(1, 1 / (loss + transaction_cost))`. Zero for a
    /// non-positive bankroll.
    pub fn max_safe_bet(&self, current_bankroll: f64) -> f64 {
        if current_bankroll <= 0.0 {
            return 0.0;
        }
        (1.0 / self.total_cost()).min(1.0)
    }
}

/// Tuning knobs for entry-price queries.
#[derive(Debug, Clone, Copy)]
pub struct EntryPriceOptions {
    /// Bisection convergence width, in wealth units.
    pub tolerance: f64,
    /// Upper search bound as a fraction of current wealth.
    pub max_search_fraction: f64,
}

impl Default for EntryPriceOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_search_fraction: DEFAULT_MAX_SEARCH_FRACTION,
        }
    }
}

/// A bet-sizing policy for repeated binary trials.
pub trait BinaryStrategy {
    /// The bankroll fraction to stake for one trial. Always finite,
    /// non-negative, and at most [`BetTerms::max_safe_bet`]. Degenerate
    /// inputs (no edge, zero variance, gated probability) return 0, never
    /// an error.
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64;

    /// Hook for simulators to push the current bankroll into strategies
    /// that keep running state (CPPI's ratcheting floor, Dynamic's peak
    /// tracking). Default is a no-op.
    fn update_bankroll(&mut self, _current_bankroll: f64) {}

    /// Maximum price this strategy would pay to enter a one-shot gamble at
    /// the given wealth. Pure: identical inputs give identical output.
    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64;

    /// The shared bet economics this strategy was configured with.
    fn terms(&self) -> &BetTerms;

    /// See [`BetTerms::max_safe_bet`].
    fn max_safe_bet(&self, current_bankroll: f64) -> f64 {
        self.terms().max_safe_bet(current_bankroll)
    }
}

pub(crate) fn validate_unit_interval(
    value: f64,
    name: &str,
) -> Result<(), StrategyError> {
    if !(0.0..=1.0).contains(&value) || !value.is_finite() {
        return Err(StrategyError::invalid(format!(
            "{name} must be between 0 and 1"
        )));
    }
    Ok(())
}
