//! Monte Carlo simulators for repeated binary trials.
//!
//! Every simulator drives the same per-trial loop against a strategy and a
//! bankroll; they differ only in where each trial's win probability comes
//! from:
//! - [`RepeatedBinarySimulator`]: one fixed probability for every trial,
//! - [`RandomBinarySimulator`]: probability drawn from `Normal(0.5, stdev)`,
//! - [`RandomUncertainBinarySimulator`]: the strategy sees the drawn
//!   probability, but the realized outcome uses an independently perturbed
//!   one.
//!
//! A run ends in one of three ways: the configured trial count is exhausted,
//! the bettable funds run out (clean early stop), or a debit trips the
//! bankroll's ruin protection, in which case the error propagates to the
//! caller. Early termination on ruin is observable behavior, not a
//! simulator failure.

pub mod random;
pub mod random_uncertain;
pub mod repeated;

pub use random::RandomBinarySimulator;
pub use random_uncertain::RandomUncertainBinarySimulator;
pub use repeated::RepeatedBinarySimulator;

use rand::Rng;
use tracing::trace;

use crate::domain::bankroll::BankRoll;
use crate::domain::strategy::BinaryStrategy;
use crate::error::{BankrollError, StrategyError};

pub(crate) fn validate_trials(trials: u32) -> Result<(), StrategyError> {
    if trials == 0 {
        return Err(StrategyError::invalid(
            "Number of trials must be at least 1",
        ));
    }
    Ok(())
}

pub(crate) fn validate_probability(probability: f64) -> Result<(), StrategyError> {
    if !(0.0..=1.0).contains(&probability) || !probability.is_finite() {
        return Err(StrategyError::invalid(
            "Probability must be between 0 and 1",
        ));
    }
    Ok(())
}

pub(crate) fn validate_stdev(stdev: f64) -> Result<(), StrategyError> {
    if stdev < 0.0 || !stdev.is_finite() {
        return Err(StrategyError::invalid(
            "Standard deviation must be non-negative",
        ));
    }
    Ok(())
}

/// Runs one trial: size the bet against `strategy_probability`, resolve the
/// outcome against `outcome_probability`, settle against the bankroll.
///
/// Returns `Ok(true)` while the run can continue, `Ok(false)` when the
/// bettable funds are exhausted, and the ruin error when settlement trips
/// the bankroll's protection.
pub(crate) fn run_trial<S: BinaryStrategy + ?Sized, R: Rng + ?Sized>(
    strategy: &mut S,
    bankroll: &mut BankRoll,
    strategy_probability: f64,
    outcome_probability: f64,
    rng: &mut R,
) -> Result<bool, BankrollError> {
    let bettable = bankroll.bettable_funds();
    if bettable <= 0.0 {
        return Ok(false);
    }

    strategy.update_bankroll(bankroll.total_funds());
    let fraction = strategy.evaluate(strategy_probability, bankroll.total_funds());
    let won = rng.gen_range(0.0..1.0) < outcome_probability;
    trace!(
        probability = strategy_probability,
        fraction,
        won,
        funds = bankroll.total_funds(),
        "trial"
    );

    // Nothing staked, nothing settled.
    if fraction <= 0.0 {
        return Ok(true);
    }

    let terms = *strategy.terms();
    if won {
        bankroll.deposit(terms.payoff * bettable * fraction - terms.transaction_cost);
    } else {
        bankroll.withdraw(terms.loss * bettable * fraction - terms.transaction_cost)?;
    }
    Ok(true)
}
