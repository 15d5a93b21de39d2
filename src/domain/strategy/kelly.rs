//! Kelly Criterion bet sizing and its conservative variants.
//!
//! Full Kelly maximizes expected log-growth but has high variance; the
//! fractional and drawdown-adjusted variants scale it down for practical
//! risk tolerance.
//!
//! Kelly formula for binary outcomes:
//!   f* = (b*p - q) / b
//! where:
//!   p = win probability, q = 1 - p
//!   b = net odds after cost adjustment (payoff - cost) / (loss + cost)

use crate::domain::gamble::Gamble;
use crate::domain::utility::find_indifference_price;
use crate::error::StrategyError;

use super::{
    BetTerms, BinaryStrategy, DEFAULT_MIN_PROBABILITY, EntryPriceOptions, validate_unit_interval,
};

/// Classic Kelly Criterion sizing, gated by a minimum win probability and
/// clamped to the max safe bet.
#[derive(Debug, Clone)]
pub struct KellyCriterion {
    terms: BetTerms,
    min_probability: f64,
}

impl KellyCriterion {
    /// Creates a Kelly strategy with the default probability gate (0.5).
    pub fn new(payoff: f64, loss: f64, transaction_cost: f64) -> Result<Self, StrategyError> {
        Self::with_min_probability(payoff, loss, transaction_cost, DEFAULT_MIN_PROBABILITY)
    }

    /// Creates a Kelly strategy with a custom probability gate.
    pub fn with_min_probability(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        min_probability: f64,
    ) -> Result<Self, StrategyError> {
        let terms = BetTerms::new(payoff, loss, transaction_cost)?;
        validate_unit_interval(min_probability, "Minimum probability")?;
        Ok(Self {
            terms,
            min_probability,
        })
    }

    /// The cost-adjusted Kelly fraction, before the probability gate and
    /// safe-bet clamp. Zero when the adjusted edge is non-positive or the
    /// net odds degenerate.
    fn raw_fraction(&self, probability: f64) -> f64 {
        let adjusted_payoff = self.terms.payoff - self.terms.transaction_cost;
        let adjusted_loss = self.terms.loss + self.terms.transaction_cost;
        if adjusted_payoff <= 0.0 {
            return 0.0;
        }

        let b = adjusted_payoff / adjusted_loss;
        if b <= 0.0 || !b.is_finite() {
            return 0.0;
        }

        let q = 1.0 - probability;
        let fraction = (b * probability - q) / b;
        fraction.max(0.0)
    }

    pub(crate) fn sized_fraction(&self, probability: f64, current_bankroll: f64) -> f64 {
        if probability < self.min_probability {
            return 0.0;
        }
        self.raw_fraction(probability)
            .min(self.terms.max_safe_bet(current_bankroll))
    }

    pub(crate) fn log_utility_price(
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
}

impl BinaryStrategy for KellyCriterion {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        self.sized_fraction(probability, current_bankroll)
    }

    /// Log utility (γ = 1), consistent with Kelly's growth-maximizing
    /// derivation.
    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        self.log_utility_price(gamble, current_wealth, opts)
    }

    fn terms(&self) -> &BetTerms {
        &self.terms
    }
}

/// Fractional Kelly: a fixed multiplier on full Kelly. Quarter-Kelly keeps
/// roughly three quarters of the growth rate at a fraction of the variance.
#[derive(Debug, Clone)]
pub struct FractionalKellyCriterion {
    inner: KellyCriterion,
    fraction: f64,
}

impl FractionalKellyCriterion {
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        fraction: f64,
    ) -> Result<Self, StrategyError> {
        let inner = KellyCriterion::new(payoff, loss, transaction_cost)?;
        validate_unit_interval(fraction, "Fraction")?;
        Ok(Self { inner, fraction })
    }

    /// The configured Kelly multiplier.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl BinaryStrategy for FractionalKellyCriterion {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        self.fraction * self.inner.sized_fraction(probability, current_bankroll)
    }

    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        self.fraction * self.inner.log_utility_price(gamble, current_wealth, opts)
    }

    fn terms(&self) -> &BetTerms {
        self.inner.terms()
    }
}

/// Kelly scaled by drawdown tolerance.
///
/// Full Kelly historically incurs peak-to-trough drawdowns of about half
/// the bankroll, so a tolerance below 0.5 de-levers proportionally:
/// `scale = min(1, max_acceptable_drawdown / 0.5)`.
#[derive(Debug, Clone)]
pub struct DrawdownAdjustedKelly {
    inner: KellyCriterion,
    max_acceptable_drawdown: f64,
}

/// Approximate expected peak-to-trough drawdown of full Kelly.
const FULL_KELLY_DRAWDOWN: f64 = 0.5;

impl DrawdownAdjustedKelly {
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        max_acceptable_drawdown: f64,
    ) -> Result<Self, StrategyError> {
        let inner = KellyCriterion::new(payoff, loss, transaction_cost)?;
        if max_acceptable_drawdown <= 0.0
            || max_acceptable_drawdown >= 1.0
            || !max_acceptable_drawdown.is_finite()
        {
            return Err(StrategyError::invalid(
                "Maximum acceptable drawdown must be between 0 and 1 exclusive",
            ));
        }
        Ok(Self {
            inner,
            max_acceptable_drawdown,
        })
    }

    fn scale(&self) -> f64 {
        (self.max_acceptable_drawdown / FULL_KELLY_DRAWDOWN).min(1.0)
    }
}

impl BinaryStrategy for DrawdownAdjustedKelly {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        self.scale() * self.inner.sized_fraction(probability, current_bankroll)
    }

    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        self.scale() * self.inner.log_utility_price(gamble, current_wealth, opts)
    }

    fn terms(&self) -> &BetTerms {
        self.inner.terms()
    }
}
