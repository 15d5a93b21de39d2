//! Constant Proportion Portfolio Insurance sizing.
//!
//! Protects a floor of capital and risks only the cushion above it. The
//! floor is a fraction of the highest bankroll ever observed and ratchets
//! upward with new peaks, never down.

use tracing::debug;

use crate::domain::gamble::Gamble;
use crate::error::StrategyError;

use super::{BetTerms, BinaryStrategy, DEFAULT_MIN_PROBABILITY, EntryPriceOptions};

/// CPPI sizing with an expected-value-scaled exposure.
///
/// Exposure per trial is `multiplier * min(1, ev_per_unit) * cushion`,
/// converted to a bankroll proportion and further capped so the worst-case
/// single loss cannot breach the floor.
#[derive(Debug, Clone)]
pub struct CppiStrategy {
    terms: BetTerms,
    floor_fraction: f64,
    multiplier: f64,
    min_probability: f64,
    /// Highest bankroll observed so far.
    peak_bankroll: f64,
    /// Protected capital: `floor_fraction * peak_bankroll`, ratchets up only.
    floor: f64,
}

impl CppiStrategy {
    /// Creates a CPPI strategy with the default probability gate (0.5).
    pub fn new(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        floor_fraction: f64,
        multiplier: f64,
        initial_bankroll: f64,
    ) -> Result<Self, StrategyError> {
        Self::with_min_probability(
            payoff,
            loss,
            transaction_cost,
            floor_fraction,
            multiplier,
            initial_bankroll,
            DEFAULT_MIN_PROBABILITY,
        )
    }

    pub fn with_min_probability(
        payoff: f64,
        loss: f64,
        transaction_cost: f64,
        floor_fraction: f64,
        multiplier: f64,
        initial_bankroll: f64,
        min_probability: f64,
    ) -> Result<Self, StrategyError> {
        let terms = BetTerms::new(payoff, loss, transaction_cost)?;
        if !(0.0..1.0).contains(&floor_fraction) || !floor_fraction.is_finite() {
            return Err(StrategyError::invalid(
                "Floor fraction must be between 0 and 1",
            ));
        }
        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(StrategyError::invalid("Multiplier must be greater than 0"));
        }
        if initial_bankroll <= 0.0 || !initial_bankroll.is_finite() {
            return Err(StrategyError::invalid(
                "Initial bankroll must be greater than 0",
            ));
        }
        if !(0.0..=1.0).contains(&min_probability) {
            return Err(StrategyError::invalid(
                "Minimum probability must be between 0 and 1",
            ));
        }

        Ok(Self {
            terms,
            floor_fraction,
            multiplier,
            min_probability,
            peak_bankroll: initial_bankroll,
            floor: floor_fraction * initial_bankroll,
        })
    }

    /// The current protected floor value.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// The highest bankroll observed so far.
    pub fn peak_bankroll(&self) -> f64 {
        self.peak_bankroll
    }

    pub fn floor_fraction(&self) -> f64 {
        self.floor_fraction
    }

    fn ratchet(&mut self, current_bankroll: f64) {
        if current_bankroll > self.peak_bankroll {
            self.peak_bankroll = current_bankroll;
            let new_floor = self.floor_fraction * self.peak_bankroll;
            if new_floor > self.floor {
                debug!(floor = new_floor, peak = self.peak_bankroll, "CPPI floor ratcheted");
                self.floor = new_floor;
            }
        }
    }
}

impl BinaryStrategy for CppiStrategy {
    fn evaluate(&mut self, probability: f64, current_bankroll: f64) -> f64 {
        self.ratchet(current_bankroll);

        if probability < self.min_probability || current_bankroll <= 0.0 {
            return 0.0;
        }

        let ev_unit = self.terms.expected_value(probability);
        if ev_unit <= 0.0 {
            return 0.0;
        }

        let cushion = (current_bankroll - self.floor).max(0.0);
        let exposure = self.multiplier * ev_unit.min(1.0) * cushion;
        let proportion = (exposure / current_bankroll).min(1.0);

        // Worst-case single loss must not breach the floor.
        let max_floor_bet =
            (current_bankroll - self.floor) / (current_bankroll * self.terms.total_cost());

        proportion
            .min(max_floor_bet.max(0.0))
            .min(self.terms.max_safe_bet(current_bankroll))
    }

    fn update_bankroll(&mut self, current_bankroll: f64) {
        self.ratchet(current_bankroll);
    }

    /// Pays at most the cushion above the protected floor, capped at the
    /// search bound. A mechanical rule, not a utility-theoretic price.
    fn max_entry_price(
        &self,
        _gamble: &Gamble,
        current_wealth: f64,
        opts: &EntryPriceOptions,
    ) -> f64 {
        (current_wealth - self.floor)
            .min(opts.max_search_fraction * current_wealth)
            .max(0.0)
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
    fn test_expected_value_scaled_exposure() {
        let mut strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 2.0, 1000.0).unwrap();
        // floor 500, cushion 500, ev 0.2: exposure = 2 * 0.2 * 500 = 200,
        // proportion 200 / 1000 = 0.2
        assert!(approx(strategy.evaluate(0.6, 1000.0), 0.2, 1e-12));
    }

    #[test]
    fn test_cushion_shrinks_with_bankroll() {
        let mut strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 2.0, 1000.0).unwrap();
        // At 600 the cushion is 100: exposure 2 * 0.2 * 100 = 40 → 40/600.
        assert!(approx(strategy.evaluate(0.6, 600.0), 40.0 / 600.0, 1e-12));
    }

    #[test]
    fn test_floor_ratchets_with_new_peak() {
        let mut strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 2.0, 1000.0).unwrap();
        assert_eq!(strategy.floor(), 500.0);

        strategy.update_bankroll(2000.0);
        assert_eq!(strategy.peak_bankroll(), 2000.0);
        assert_eq!(strategy.floor(), 1000.0);

        // The floor never moves back down.
        strategy.update_bankroll(600.0);
        assert_eq!(strategy.floor(), 1000.0);
    }

    #[test]
    fn test_at_or_below_floor_sits_out() {
        let mut strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.8, 2.0, 1000.0).unwrap();
        assert_eq!(strategy.evaluate(0.6, 800.0), 0.0);
        assert_eq!(strategy.evaluate(0.6, 700.0), 0.0);
    }

    #[test]
    fn test_min_probability_gate() {
        let mut strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 2.0, 1000.0).unwrap();
        assert!(strategy.evaluate(0.6, 1000.0) > 0.0);
        assert_eq!(strategy.evaluate(0.49, 1000.0), 0.0);
    }

    #[test]
    fn test_negative_edge_sits_out() {
        let mut strategy =
            CppiStrategy::with_min_probability(1.0, 1.0, 0.0, 0.5, 2.0, 1000.0, 0.0).unwrap();
        assert_eq!(strategy.evaluate(0.4, 1000.0), 0.0);
    }

    #[test]
    fn test_multiplier_scales_exposure() {
        let mut low = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 1.0, 1000.0).unwrap();
        let mut high = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 3.0, 1000.0).unwrap();
        assert!(approx(
            high.evaluate(0.6, 1000.0),
            3.0 * low.evaluate(0.6, 1000.0),
            1e-12
        ));
    }

    #[test]
    fn test_worst_case_loss_cannot_breach_floor() {
        // Heavy downside (loss 2 per unit), generous edge: the floor cap
        // binds before the exposure formula does.
        let mut strategy =
            CppiStrategy::with_min_probability(5.0, 2.0, 0.0, 0.8, 10.0, 1000.0, 0.0).unwrap();
        let fraction = strategy.evaluate(0.9, 1000.0);
        // max_floor_bet = 200 / (1000 * 2) = 0.1
        assert!(fraction <= 0.1 + 1e-12);

        // A full loss at that fraction leaves the floor intact.
        let after_loss = 1000.0 - fraction * 1000.0 * 2.0;
        assert!(after_loss >= strategy.floor() - 1e-9);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(CppiStrategy::new(1.0, 1.0, 0.0, -0.1, 2.0, 1000.0).is_err());
        assert!(CppiStrategy::new(1.0, 1.0, 0.0, 1.0, 2.0, 1000.0).is_err());
        assert!(CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 0.0, 1000.0).is_err());
        assert!(CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 2.0, 0.0).is_err());
    }

    #[test]
    fn test_entry_price_is_cushion_capped() {
        let strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 2.0, 1000.0).unwrap();
        let gamble = Gamble::new(vec![100.0, -50.0], vec![0.6, 0.4]).unwrap();
        let opts = EntryPriceOptions::default();

        // Cushion above the 500 floor is 4500, but the search bound caps
        // at half of wealth.
        let price = strategy.max_entry_price(&gamble, 5000.0, &opts);
        assert!(approx(price, 2500.0, 1e-12));

        // Below the floor nothing is paid.
        let price = strategy.max_entry_price(&gamble, 400.0, &opts);
        assert_eq!(price, 0.0);
    }
}
