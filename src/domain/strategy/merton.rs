//! Merton share bet sizing.
//!
//! Robert Merton's continuous-time portfolio fraction `μ / (γ σ²)` applied
//! to a discrete binary trial: excess return over the trial's variance,
//! scaled down by the bettor's relative risk aversion.

use crate::domain::gamble::Gamble;
use crate::domain::utility::find_indifference_price;
use crate::error::StrategyError;

use super::{BetTerms, BinaryStrategy, DEFAULT_MIN_PROBABILITY, EntryPriceOptions};

/// Merton share sizing with a hard fraction cap.
///
/// `μ` is the cost-adjusted expected return per unit; `σ²` is the variance
/// of the raw win/loss outcome. Higher `risk_aversion` shrinks the share
/// proportionally.
#[derive(Debug, Clone)]
pub struct MertonShare {
    terms: BetTerms,
    risk_aversion: f64,
    min_probability: f64,
    max_fraction: f64,
}

impl MertonShare {
    /// Creates a Merton share strategy with the default gate (0.5) and no
    /// extra cap beyond the safe-bet bound.
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        risk_aversion: f64,
    ) -> Result<Self, StrategyError> {
        Self::with_limits(
            payoff,
            loss,
            transaction_cost,
            risk_aversion,
            DEFAULT_MIN_PROBABILITY,
            1.0,
        )
    }

    pub fn with_limits(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        risk_aversion: f64,
        min_probability: f64,
        max_fraction: f64,
    ) -> Result<Self, StrategyError> {
        let terms = BetTerms::new(payoff, loss, transaction_cost)?;
        if risk_aversion <= 0.0 || !risk_aversion.is_finite() {
            return Err(StrategyError::invalid(
                "Risk aversion must be greater than 0",
            ));
        }
        if !(0.0..=1.0).contains(&min_probability) {
            return Err(StrategyError::invalid(
                "Minimum probability must be between 0 and 1",
            ));
        }
        if max_fraction <= 0.0 || max_fraction > 1.0 || !max_fraction.is_finite() {
            return Err(StrategyError::invalid(
                "Maximum fraction must be between 0 and 1",
            ));
        }
        Ok(Self {
            terms,
            risk_aversion,
            min_probability,
            max_fraction,
        })
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Variance of the raw binary outcome (`payoff` with probability `p`,
    /// `-loss` otherwise), ignoring transaction cost.
    fn outcome_variance(&self, probability: f64) -> f64 {
        let q = 1.0 - probability;
        let mean = probability * self.terms.payoff - q * self.terms.loss;
        let second_moment =
            probability * self.terms.payoff.powi(2) + q * self.terms.loss.powi(2);
        second_moment - mean.powi(2)
    }
}

impl BinaryStrategy for MertonShare {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        if probability < self.min_probability {
            return 0.0;
        }

        let cost = self.terms.transaction_cost;
        let excess = probability * (self.terms.payoff - cost)
            - (1.0 - probability) * (self.terms.loss + cost);
        if excess <= 0.0 {
            return 0.0;
        }

        let variance = self.outcome_variance(probability);
        // Zero variance means a sure thing; the share is undefined, sit out.
        if variance <= 0.0 {
            return 0.0;
        }

        let share = excess / (self.risk_aversion * variance);
        share
            .clamp(0.0, self.max_fraction)
            .min(self.terms.max_safe_bet(current_bankroll))
    }

    /// CRRA indifference price at this strategy's own risk aversion.
    fn max_entry_price(
        &self,
        gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        find_indifference_price(
            gamble,
            current_wealth,
            self.risk_aversion,
            opts.tolerance,
            opts.max_search_fraction,
        )
    }

    fn terms(&self) -> &BetTerms {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_known_values() {
        // Even odds: μ = 0.2, σ² = 1 - 0.04 = 0.96, share = 0.2 / 1.92.
        let mut strategy = MertonShare::new(1.0, 1.0, 0.0, 2.0).unwrap();
        assert!(approx(strategy.evaluate(0.6, 1000.0), 0.1042, 1e-4));

        // 2:1 payoff: μ = 0.8, σ² = 2.8 - 0.64 = 2.16, share = 0.8 / 4.32.
        let mut strategy = MertonShare::new(2.0, 1.0, 0.0, 2.0).unwrap();
        assert!(approx(strategy.evaluate(0.6, 1000.0), 0.1852, 1e-4));
    }

    #[test]
    fn test_risk_aversion_scales_inversely() {
        let mut timid = MertonShare::new(1.0, 1.0, 0.0, 4.0).unwrap();
        let mut bold = MertonShare::new(1.0, 1.0, 0.0, 1.0).unwrap();
        assert!(approx(
            bold.evaluate(0.6, 1000.0),
            4.0 * timid.evaluate(0.6, 1000.0),
            1e-12
        ));
    }

    #[test]
    fn test_min_probability_gate() {
        let mut strategy = MertonShare::new(1.0, 1.0, 0.0, 2.0).unwrap();
        assert_eq!(strategy.evaluate(0.49, 1000.0), 0.0);
    }

    #[test]
    fn test_negative_excess_sits_out() {
        let mut strategy =
            MertonShare::with_limits(1.0, 1.0, 0.0, 2.0, 0.0, 1.0).unwrap();
        assert_eq!(strategy.evaluate(0.4, 1000.0), 0.0);

        // Cost swallows the edge.
        let mut costed =
            MertonShare::with_limits(1.0, 1.0, 0.25, 2.0, 0.0, 1.0).unwrap();
        assert_eq!(costed.evaluate(0.6, 1000.0), 0.0);
    }

    #[test]
    fn test_sure_thing_has_no_share() {
        // p = 1 makes the variance collapse to 0.
        let mut strategy = MertonShare::new(1.0, 1.0, 0.0, 2.0).unwrap();
        assert_eq!(strategy.evaluate(1.0, 1000.0), 0.0);
    }

    #[test]
    fn test_max_fraction_cap() {
        let mut capped =
            MertonShare::with_limits(1.0, 1.0, 0.0, 0.1, 0.5, 0.25).unwrap();
        // γ = 0.1 blows the raw share well past the cap.
        assert!(approx(capped.evaluate(0.6, 1000.0), 0.25, 1e-12));
    }

    #[test]
    fn test_invalid_parameters() {
        let err = MertonShare::new(1.0, 1.0, 0.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Risk aversion"));
        assert!(MertonShare::new(1.0, 1.0, 0.0, -1.0).is_err());
        assert!(MertonShare::with_limits(1.0, 1.0, 0.0, 2.0, 1.5, 1.0).is_err());
        assert!(MertonShare::with_limits(1.0, 1.0, 0.0, 2.0, 0.5, 0.0).is_err());
    }

    #[test]
    fn test_entry_price_respects_risk_aversion() {
        let gamble = Gamble::new(vec![100.0, -50.0], vec![0.6, 0.4]).unwrap();
        let opts = EntryPriceOptions::default();

        let timid = MertonShare::new(1.0, 1.0, 0.0, 4.0).unwrap();
        let bold = MertonShare::new(1.0, 1.0, 0.0, 1.0).unwrap();
        let timid_price = timid.max_entry_price(&gamble, 5000.0, &opts);
        let bold_price = bold.max_entry_price(&gamble, 5000.0, &opts);
        assert!(timid_price <= bold_price);
        assert!(bold_price > 0.0);
    }
}
