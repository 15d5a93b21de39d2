//! One-shot discrete gamble specification for entry-price queries.

use crate::error::StrategyError;

/// Slack allowed when checking that probabilities sum to at most one.
const PROBABILITY_SUM_EPSILON: f64 = 1e-9;

/// A finite discrete payoff distribution, added to current wealth if the
/// gamble is accepted.
///
/// Probabilities must each lie in [0, 1] and sum to at most 1; any residual
/// mass is treated as a zero-payoff outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Gamble {
    outcomes: Vec<f64>,
    probabilities: Vec<f64>,
}

impl Gamble {
    /// Builds a validated gamble from parallel outcome/probability slices.
    pub fn new(outcomes: Vec<f64>, probabilities: Vec<f64>) -> Result<Self, StrategyError> {
        if outcomes.is_empty() {
            return Err(StrategyError::invalid(
                "Gamble must have at least one outcome",
            ));
        }
        if outcomes.len() != probabilities.len() {
            return Err(StrategyError::invalid(
                "Outcomes and probabilities must have the same length",
            ));
        }
        for &p in &probabilities {
            if !(0.0..=1.0).contains(&p) || !p.is_finite() {
                return Err(StrategyError::invalid(
                    "Each probability must be between 0 and 1",
                ));
            }
        }
        let total: f64 = probabilities.iter().sum();
        if total > 1.0 + PROBABILITY_SUM_EPSILON {
            return Err(StrategyError::invalid(
                "Probabilities must sum to at most 1",
            ));
        }
        for &o in &outcomes {
            if !o.is_finite() {
                return Err(StrategyError::invalid("Each outcome must be finite"));
            }
        }

        Ok(Self {
            outcomes,
            probabilities,
        })
    }

    /// The outcome amounts.
    pub fn outcomes(&self) -> &[f64] {
        &self.outcomes
    }

    /// The outcome probabilities.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability-weighted expected value of the gamble. The residual
    /// (zero-payoff) mass contributes nothing.
    pub fn expected_value(&self) -> f64 {
        self.outcomes
            .iter()
            .zip(&self.probabilities)
            .map(|(o, p)| o * p)
            .sum()
    }

    /// The binary win/lose gamble implied by simple bet terms: win `payoff`
    /// with probability `p`, lose `loss` otherwise.
    pub fn binary(payoff: f64, loss: f64, probability: f64) -> Result<Self, StrategyError> {
        Self::new(vec![payoff, -loss], vec![probability, 1.0 - probability])
    }
}
