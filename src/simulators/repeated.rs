//! Fixed-probability trial simulator.

use rand::Rng;
use tracing::info;

use crate::domain::bankroll::BankRoll;
use crate::domain::strategy::BinaryStrategy;
use crate::error::{BankrollError, StrategyError};

use super::{run_trial, validate_probability, validate_trials};

/// Runs every trial at the same win probability.
///
/// The simplest regime: the strategy is told the true probability, so this
/// isolates sizing behavior from estimation error.
#[derive(Debug, Clone, Copy)]
pub struct RepeatedBinarySimulator {
    probability: f64,
    trials: u32,
}

impl RepeatedBinarySimulator {
    pub fn new(probability: f64, trials: u32) -> Result<Self, StrategyError> {
        validate_probability(probability)?;
        validate_trials(trials)?;
        Ok(Self {
            probability,
            trials,
        })
    }

    /// Runs the full trial loop with a thread-local RNG.
    pub fn evaluate_strategy<S: BinaryStrategy + ?Sized>(
        &self,
        strategy: &mut S,
        bankroll: &mut BankRoll,
    ) -> Result<(), BankrollError> {
        self.evaluate_strategy_with_rng(strategy, bankroll, &mut rand::thread_rng())
    }

    /// Runs the full trial loop with a caller-supplied RNG, so seeded runs
    /// replay identical outcome streams.
    pub fn evaluate_strategy_with_rng<S: BinaryStrategy + ?Sized, R: Rng + ?Sized>(
        &self,
        strategy: &mut S,
        bankroll: &mut BankRoll,
        rng: &mut R,
    ) -> Result<(), BankrollError> {
        for trial in 0..self.trials {
            let ongoing = run_trial(
                strategy,
                bankroll,
                self.probability,
                self.probability,
                rng,
            )?;
            if !ongoing {
                info!(trial, "bankroll exhausted, stopping early");
                break;
            }
        }
        Ok(())
    }
}
