//! Normal-drawn probability simulator.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::info;

use crate::domain::bankroll::BankRoll;
use crate::domain::strategy::BinaryStrategy;
use crate::error::{BankrollError, StrategyError};

use super::{run_trial, validate_stdev, validate_trials};

/// Draws each trial's win probability from `Normal(0.5, stdev)`, clamped to
/// [0, 1]. The strategy sees the same probability that resolves the
/// outcome; only the edge varies between trials.
#[derive(Debug, Clone, Copy)]
pub struct RandomBinarySimulator {
    probability_dist: Normal<f64>,
    trials: u32,
}

impl RandomBinarySimulator {
    pub fn new(stdev: f64, trials: u32) -> Result<Self, StrategyError> {
        validate_stdev(stdev)?;
        validate_trials(trials)?;
        let probability_dist = Normal::new(0.5, stdev)
            .map_err(|_| StrategyError::invalid("Standard deviation must be non-negative"))?;
        Ok(Self {
            probability_dist,
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

    /// Runs the full trial loop with a caller-supplied RNG.
    pub fn evaluate_strategy_with_rng<S: BinaryStrategy + ?Sized, R: Rng + ?Sized>(
        &self,
        strategy: &mut S,
        bankroll: &mut BankRoll,
        rng: &mut R,
    ) -> Result<(), BankrollError> {
        for trial in 0..self.trials {
            let probability = self.probability_dist.sample(rng).clamp(0.0, 1.0);
            let ongoing = run_trial(strategy, bankroll, probability, probability, rng)?;
            if !ongoing {
                info!(trial, "bankroll exhausted, stopping early");
                break;
            }
        }
        Ok(())
    }
}
