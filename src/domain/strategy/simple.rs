//! Baseline strategies: expected-value sizing and a constant fraction.
//!
//! Both exist mostly as comparison anchors for the simulators; neither is a
//! serious sizing doctrine.

use crate::domain::gamble::Gamble;
use crate::error::StrategyError;

use super::{
    BetTerms, BinaryStrategy, DEFAULT_MIN_PROBABILITY, EntryPriceOptions, validate_unit_interval,
};

/// Bets the expected value per unit payoff whenever it is positive.
///
/// No probability gate: the expected-value test itself decides.
#[derive(Debug, Clone)]
pub struct NaiveStrategy {
    terms: BetTerms,
}

impl NaiveStrategy {
    pub fn new(payoff: f64, loss: f64, transaction_cost: f64) -> Result<Self, StrategyError> {
        Ok(Self {
            terms: BetTerms::new(payoff, loss, transaction_cost)?,
        })
    }
}

impl BinaryStrategy for NaiveStrategy {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        let ev = self.terms.expected_value(probability);
        if ev <= 0.0 {
            return 0.0;
        }
        (ev / self.terms.payoff).min(self.terms.max_safe_bet(current_bankroll))
    }

    /// Pays the gamble's expected value — the risk-neutral price, capped at
    /// the search bound. A mechanical rule, not a utility-theoretic price.
    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        gamble
            .expected_value()
            .clamp(0.0, opts.max_search_fraction * current_wealth)
    }

    fn terms(&self) -> &BetTerms {
        &self.terms
    }
}

/// Bets a constant configured fraction whenever the probability clears the
/// gate. Ignores the edge entirely — a deliberate dumb baseline.
#[derive(Debug, Clone)]
pub struct FixedFractionStrategy {
    terms: BetTerms,
    fraction: f64,
    min_probability: f64,
}

impl FixedFractionStrategy {
    /// Creates a fixed-fraction strategy with the default gate (0.5).
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        fraction: f64,
    ) -> Result<Self, StrategyError> {
        Self::with_min_probability(
            payoff,
            loss,
            transaction_cost,
            fraction,
            DEFAULT_MIN_PROBABILITY,
        )
    }

    pub fn with_min_probability(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        fraction: f64,
        min_probability: f64,
    ) -> Result<Self, StrategyError> {
        let terms = BetTerms::new(payoff, loss, transaction_cost)?;
        validate_unit_interval(fraction, "Fraction")?;
        validate_unit_interval(min_probability, "Minimum probability")?;
        Ok(Self {
            terms,
            fraction,
            min_probability,
        })
    }
}

impl BinaryStrategy for FixedFractionStrategy {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        if probability < self.min_probability {
            return 0.0;
        }
        self.fraction.min(self.terms.max_safe_bet(current_bankroll))
    }

    /// Pays its fixed fraction of wealth, regardless of the gamble. A
    /// mechanical rule, not a utility-theoretic price.
    fn max_entry_price(
        &self,
        _gamble: &Gamble,
        current_wealth: f64,
        _opts: &EntryPriceOptions,
    ) -> f64 {
        self.fraction * current_wealth
    }

    fn terms(&self) -> &BetTerms {
        &self.terms
    }
}
