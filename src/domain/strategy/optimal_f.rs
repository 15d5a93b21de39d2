//! Ralph Vince's Optimal f bet sizing.
//!
//! Sizes to maximize geometric growth from a historical win rate and a
//! reward/risk ratio, with a hard cap (`max_risk_fraction`) because raw
//! Optimal f is notoriously aggressive.

use crate::domain::gamble::Gamble;
use crate::domain::utility::find_indifference_price;
use crate::error::StrategyError;

use super::{BetTerms, BinaryStrategy, EntryPriceOptions};

/// Default cap on the Optimal f fraction.
const DEFAULT_MAX_RISK_FRACTION: f64 = 0.2;

/// Optimal f sizing: `f* = W - (1 - W) * L / R` with cost-adjusted
/// reward `R = payoff - cost` and risk `L = loss + cost`.
#[derive(Debug, Clone)]
pub struct OptimalF {
    terms: BetTerms,
    win_rate: f64,
    max_risk_fraction: f64,
}

impl OptimalF {
    /// Creates an Optimal f strategy with the default 20% risk cap.
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        win_rate: f64,
    ) -> Result<Self, StrategyError> {
        Self::with_max_risk_fraction(
            payoff,
            loss,
            transaction_cost,
            win_rate,
            DEFAULT_MAX_RISK_FRACTION,
        )
    }

    pub fn with_max_risk_fraction(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        win_rate: f64,
        max_risk_fraction: f64,
    ) -> Result<Self, StrategyError> {
        let terms = BetTerms::new(payoff, loss, transaction_cost)?;
        if !(0.0..=1.0).contains(&win_rate) || !win_rate.is_finite() {
            return Err(StrategyError::invalid("Win rate must be between 0 and 1"));
        }
        if max_risk_fraction <= 0.0 || max_risk_fraction > 1.0 || !max_risk_fraction.is_finite() {
            return Err(StrategyError::invalid(
                "Maximum risk fraction must be between 0 and 1",
            ));
        }
        Ok(Self {
            terms,
            win_rate,
            max_risk_fraction,
        })
    }

    /// The stored historical win rate, used when no live probability is
    /// supplied.
    pub fn win_rate(&self) -> f64 {
        self.win_rate
    }
}

impl BinaryStrategy for OptimalF {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        // A non-positive probability means "no live estimate"; fall back to
        // the stored win rate.
        let w = if probability > 0.0 {
            probability
        } else {
            self.win_rate
        };

        let reward = self.terms.payoff - self.terms.transaction_cost;
        let risk = self.terms.loss + self.terms.transaction_cost;
        if reward <= 0.0 {
            return 0.0;
        }

        let fraction = w - (1.0 - w) * risk / reward;
        fraction
            .clamp(0.0, self.max_risk_fraction)
            .min(self.terms.max_safe_bet(current_bankroll))
    }

    /// Log utility, like Kelly: Optimal f shares the growth-maximizing
    /// derivation.
    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        find_indifference_price(
            gamble,
            current_wealth,
            1.0,
            opts.tolerance,
            opts.max_search_fraction,
        )
    }

    fn terms(&self) -> &BetTerms {
        &self.terms
    }
}
