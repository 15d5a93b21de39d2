//! Normal-drawn probability with estimation noise.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::info;

use crate::domain::bankroll::BankRoll;
use crate::domain::strategy::BinaryStrategy;
use crate::error::{BankrollError, StrategyError};

use super::{run_trial, validate_stdev, validate_trials};

/// Like [`super::RandomBinarySimulator`], but the strategy's estimate and
/// the realized outcome diverge: the strategy sees the `Normal(0.5, stdev)`
/// draw, while the outcome resolves against that draw plus an independent
/// `Normal(0, uncertainty_stdev)` perturbation. Models betting on a noisy
/// probability estimate.
#[derive(Debug, Clone, Copy)]
pub struct RandomUncertainBinarySimulator {
    estimate_dist: Normal<f64>,
    noise_dist: Normal<f64>,
    trials: u32,
}

impl RandomUncertainBinarySimulator {
    pub fn new(stdev: f64, uncertainty_stdev: f64, trials: u32) -> Result<Self, StrategyError> {
        validate_stdev(stdev)?;
        validate_stdev(uncertainty_stdev)?;
        validate_trials(trials)?;
        let estimate_dist = Normal::new(0.5, stdev)
            .map_err(|_| StrategyError::invalid("Standard deviation must be non-negative"))?;
        let noise_dist = Normal::new(0.0, uncertainty_stdev)
            .map_err(|_| StrategyError::invalid("Standard deviation must be non-negative"))?;
        Ok(Self {
            estimate_dist,
            noise_dist,
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
            let seen = self.estimate_dist.sample(rng).clamp(0.0, 1.0);
            let realized = (seen + self.noise_dist.sample(rng)).clamp(0.0, 1.0);
            let ongoing = run_trial(strategy, bankroll, seen, realized, rng)?;
            if !ongoing {
                info!(trial, "bankroll exhausted, stopping early");
                break;
            }
        }
        Ok(())
    }
}
