//! Dynamic bankroll management.
//!
//! Starts from a base fraction and scales it with multiplicative factors
//! computed over a sliding window of recent trial results: streak, realized
//! volatility, drawdown from peak, and the current win probability. The
//! product is clamped to configured bounds.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::gamble::Gamble;
use crate::error::StrategyError;

use super::{BetTerms, BinaryStrategy, DEFAULT_MIN_PROBABILITY, EntryPriceOptions};

const DEFAULT_MAX_FRACTION: f64 = 0.25;
const DEFAULT_MIN_FRACTION: f64 = 0.01;
/// Losing streaks never cut the streak factor below half.
const MAX_STREAK_PENALTY: f64 = 0.5;

/// One recorded trial outcome.
#[derive(Debug, Clone, Copy)]
struct TrialResult {
    won: bool,
    /// Profit or loss as a fraction of the bankroll at stake time.
    return_fraction: f64,
}

/// Adaptive sizing over a sliding window of recent results.
///
/// With an empty window `evaluate` returns the bare base fraction; once
/// results arrive the factors kick in. Smaller windows react faster because
/// each result carries more weight in the streak factor.
#[derive(Debug, Clone)]
pub struct DynamicBankrollManagement {
    terms: BetTerms,
    base_fraction: f64,
    window_size: usize,
    max_fraction: f64,
    min_fraction: f64,
    min_probability: f64,
    results: VecDeque<TrialResult>,
    peak_bankroll: f64,
    current_bankroll: f64,
}

impl DynamicBankrollManagement {
    /// Creates a manager with the default bounds (min 0.01, max 0.25) and
    /// the default probability gate (0.5).
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        base_fraction: f64,
        window_size: usize,
    ) -> Result<Self, StrategyError> {
        Self::with_limits(
            payoff,
            loss,
            transaction_cost,
            base_fraction,
            window_size,
            DEFAULT_MIN_FRACTION,
            DEFAULT_MAX_FRACTION,
            DEFAULT_MIN_PROBABILITY,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_limits(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        base_fraction: f64,
        window_size: usize,
        min_fraction: f64,
        max_fraction: f64,
        min_probability: f64,
    ) -> Result<Self, StrategyError> {
        let terms = BetTerms::new(payoff, loss, transaction_cost)?;
        if base_fraction <= 0.0 || base_fraction > 1.0 || !base_fraction.is_finite() {
            return Err(StrategyError::invalid(
                "Base fraction must be between 0 and 1",
            ));
        }
        if window_size == 0 {
            return Err(StrategyError::invalid("Window size must be positive"));
        }
        if min_fraction <= 0.0
            || min_fraction > max_fraction
            || max_fraction > 1.0
            || !min_fraction.is_finite()
            || !max_fraction.is_finite()
        {
            return Err(StrategyError::invalid(
                "Fraction bounds must satisfy 0 < min_fraction <= max_fraction <= 1",
            ));
        }
        if !(0.0..=1.0).contains(&min_probability) {
            return Err(StrategyError::invalid(
                "Minimum probability must be between 0 and 1",
            ));
        }

        Ok(Self {
            terms,
            base_fraction,
            window_size,
            max_fraction,
            min_fraction,
            min_probability,
            results: VecDeque::with_capacity(window_size),
            peak_bankroll: 0.0,
            current_bankroll: 0.0,
        })
    }

    /// Records a trial outcome with the per-unit terms as the return: wins
    /// add `payoff`, losses subtract `loss`.
    pub fn record_result(&mut self, won: bool) {
        let return_fraction = if won { self.terms.payoff } else { -self.terms.loss };
        self.record_result_with_return(won, return_fraction);
    }

    /// Records a trial outcome with an explicit realized return fraction.
    /// The oldest result falls off once the window is full.
    pub fn record_result_with_return(&mut self, won: bool, return_fraction: f64) {
        if self.results.len() == self.window_size {
            self.results.pop_front();
        }
        self.results.push_back(TrialResult {
            won,
            return_fraction,
        });
    }

    /// Number of results currently in the window.
    pub fn window_len(&self) -> usize {
        self.results.len()
    }

    /// Clears the result window and peak tracking.
    pub fn reset(&mut self) {
        self.results.clear();
        self.peak_bankroll = 0.0;
        self.current_bankroll = 0.0;
    }

    /// Streak factor: a trailing run of `n` wins scales by
    /// `1 + n / window_size`, a run of `n` losses by
    /// `1 - min(0.5, n / window_size)`. Neutral (1.0) with no results.
    pub fn streak_factor(&self) -> f64 {
        let Some(last) = self.results.back() else {
            return 1.0;
        };
        let streak = self
            .results
            .iter()
            .rev()
            .take_while(|r| r.won == last.won)
            .count();
        #[allow(clippy::cast_precision_loss)]
        let weight = streak as f64 / self.window_size as f64;
        if last.won {
            1.0 + weight
        } else {
            1.0 - weight.min(MAX_STREAK_PENALTY)
        }
    }

    /// Volatility factor: `1 / (1 + stdev)` of the windowed return
    /// fractions. Neutral with fewer than two results.
    pub fn volatility_factor(&self) -> f64 {
        if self.results.len() < 2 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.results.len() as f64;
        let mean = self.results.iter().map(|r| r.return_fraction).sum::<f64>() / n;
        let variance = self
            .results
            .iter()
            .map(|r| (r.return_fraction - mean).powi(2))
            .sum::<f64>()
            / n;
        1.0 / (1.0 + variance.sqrt())
    }

    /// Drawdown factor: `1 - drawdown / 2`, where drawdown is the fractional
    /// decline from the peak bankroll seen so far. Neutral before any
    /// bankroll has been observed.
    pub fn drawdown_factor(&self) -> f64 {
        if self.peak_bankroll <= 0.0 {
            return 1.0;
        }
        let drawdown =
            ((self.peak_bankroll - self.current_bankroll) / self.peak_bankroll).max(0.0);
        1.0 - drawdown / 2.0
    }

    /// Probability factor: `0.5 + probability`, so a coin flip is neutral
    /// and stronger edges scale up linearly.
    fn probability_factor(probability: f64) -> f64 {
        0.5 + probability
    }

    fn observe(&mut self, current_bankroll: f64) {
        self.current_bankroll = current_bankroll;
        if current_bankroll > self.peak_bankroll {
            self.peak_bankroll = current_bankroll;
        }
    }
}

impl BinaryStrategy for DynamicBankrollManagement {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        self.observe(current_bankroll);

        if probability < self.min_probability || current_bankroll <= 0.0 {
            return 0.0;
        }

        // No history yet: the base fraction stands on its own.
        if self.results.is_empty() {
            return self
                .base_fraction
                .min(self.terms.max_safe_bet(current_bankroll));
        }

        let streak = self.streak_factor();
        let volatility = self.volatility_factor();
        let drawdown = self.drawdown_factor();
        let edge = Self::probability_factor(probability);
        let fraction = self.base_fraction * streak * volatility * drawdown * edge;
        debug!(streak, volatility, drawdown, edge, fraction, "dynamic sizing factors");

        fraction
            .clamp(self.min_fraction, self.max_fraction)
            .min(self.terms.max_safe_bet(current_bankroll))
    }

    fn update_bankroll(&mut self, current_bankroll: f64) {
        self.observe(current_bankroll);
    }

    /// Pays its base fraction of wealth, regardless of the gamble. A
    /// mechanical rule, not a utility-theoretic price.
    fn max_entry_price(
        &self,
        _gamble: &Gamble,
        current_wealth: f64,
        _opts: &EntryPriceOptions,
    ) -> f64 {
        self.base_fraction * current_wealth
    }

    fn terms(&self) -> &BetTerms {
        &self.terms
    }
}
