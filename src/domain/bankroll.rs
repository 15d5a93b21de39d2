//! Bankroll ledger with solvency and drawdown protection.
//!
//! The ledger enforces two hard rules on every debit:
//! - bankruptcy: funds may never go negative (checked first),
//! - drawdown: a single debit may not exceed `max_draw_down` of the funds
//!   held before the debit (only when a limit is configured).
//!
//! Both checks happen before any mutation, so a refused operation leaves
//! the ledger exactly as it was.
//!
//! Internal accounting uses `Decimal`; the read accessors round to exactly
//! two decimals, which is a presentation contract callers may rely on.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tracing::warn;

use crate::error::BankrollError;

/// A managed bankroll for betting simulations.
///
/// Tracks funds, the percentage of funds eligible for wagering, an optional
/// maximum drawdown per debit, and an append-only history of fund snapshots
/// (one entry at construction plus one per mutating operation).
#[derive(Debug, Clone)]
pub struct BankRoll {
    /// Ledger balance.
    funds: Decimal,
    /// Fraction of funds eligible for wagering, in [0, 1].
    percent_bettable: Decimal,
    /// Maximum fraction of pre-debit funds a single debit may remove.
    /// `None` disables the rule.
    max_draw_down: Option<Decimal>,
    /// Total-funds snapshot after every mutation, chronological order.
    history: Vec<f64>,
}

/// Converts an f64 amount into the ledger's representation, saturating at
/// the `Decimal` range limits instead of panicking or silently zeroing.
fn to_decimal(value: f64) -> Decimal {
    match Decimal::from_f64(value) {
        Some(d) => d,
        None if value > 0.0 => Decimal::MAX,
        None if value < 0.0 => Decimal::MIN,
        None => Decimal::ZERO,
    }
}

impl BankRoll {
    /// Creates a bankroll with an initial balance, a bettable percentage and
    /// an optional drawdown limit.
    ///
    /// `percent_bettable` outside [0, 1] is clamped with a warning rather
    /// than rejected; the bankroll is caller-owned state, not validated
    /// strategy configuration.
    pub fn new(initial_funds: f64, percent_bettable: f64, max_draw_down: Option<f64>) -> Self {
        let clamped = percent_bettable.clamp(0.0, 1.0);
        if (clamped - percent_bettable).abs() > f64::EPSILON {
            warn!(
                percent_bettable,
                clamped, "percent_bettable outside [0, 1], clamping"
            );
        }

        let funds = to_decimal(initial_funds);
        let initial_snapshot = funds.round_dp(2).to_f64().unwrap_or(0.0);

        Self {
            funds,
            percent_bettable: to_decimal(clamped),
            max_draw_down: max_draw_down.map(to_decimal),
            history: vec![initial_snapshot],
        }
    }

    /// Creates a bankroll with the full balance bettable and no drawdown
    /// limit.
    pub fn with_funds(initial_funds: f64) -> Self {
        Self::new(initial_funds, 1.0, None)
    }

    /// Total funds, rounded to two decimals.
    pub fn total_funds(&self) -> f64 {
        self.funds.round_dp(2).to_f64().unwrap_or(0.0)
    }

    /// Funds eligible for wagering (`funds * percent_bettable`), rounded to
    /// two decimals.
    pub fn bettable_funds(&self) -> f64 {
        self.funds
            .saturating_mul(self.percent_bettable)
            .round_dp(2)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Chronological snapshots of `total_funds`, starting with the initial
    /// balance.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Credits the bankroll unconditionally.
    ///
    /// Simulators may credit a net-negative win when the transaction cost
    /// exceeds the gross payout; the ledger accepts the signed amount.
    /// Solvency is enforced on the debit side. A credit that would exceed
    /// the ledger's numeric capacity saturates instead of failing; a
    /// compounding winning streak ends pinned at the maximum, not in a
    /// crash.
    pub fn deposit(&mut self, amount: f64) {
        self.funds = self.funds.saturating_add(to_decimal(amount));
        self.snapshot();
    }

    /// Debits the bankroll, enforcing bankruptcy first and the drawdown rule
    /// second. On failure the ledger is unchanged.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), BankrollError> {
        let amt = to_decimal(amount);

        if amt > self.funds {
            warn!(
                amount,
                available = self.total_funds(),
                "withdrawal refused: bankruptcy"
            );
            return Err(BankrollError::Bankruptcy {
                amount,
                available: self.total_funds(),
            });
        }

        if let Some(limit_fraction) = self.max_draw_down {
            // The limit is computed against funds before the debit.
            let limit = limit_fraction.saturating_mul(self.funds);
            if amt > limit {
                warn!(
                    amount,
                    limit = limit.round_dp(2).to_f64().unwrap_or(0.0),
                    "withdrawal refused: drawdown limit"
                );
                return Err(BankrollError::DrawdownExceeded {
                    amount,
                    limit: limit.round_dp(2).to_f64().unwrap_or(0.0),
                });
            }
        }

        self.funds -= amt;
        self.snapshot();
        Ok(())
    }

    /// Debits a wager. Fails with a sizing error when the amount exceeds the
    /// bettable portion; no ruin check is applied — callers are responsible
    /// for pre-validating against the strategy's max safe bet.
    pub fn bet(&mut self, amount: f64) -> Result<(), BankrollError> {
        let bettable = self.bettable_funds();
        if amount > bettable {
            return Err(BankrollError::BetTooLarge {
                amount,
                bettable,
            });
        }

        self.funds -= to_decimal(amount);
        self.snapshot();
        Ok(())
    }

    /// Win-side bookkeeping alias for [`Self::deposit`], used by simulators
    /// that separate outcome settlement from raw deposits.
    pub fn add_funds(&mut self, amount: f64) {
        self.deposit(amount);
    }

    /// Loss-side bookkeeping alias for [`Self::withdraw`]; applies the same
    /// bankruptcy and drawdown guards.
    pub fn remove_funds(&mut self, amount: f64) -> Result<(), BankrollError> {
        self.withdraw(amount)
    }

    fn snapshot(&mut self) {
        self.history.push(self.total_funds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transactions_round_trip() {
        let mut br = BankRoll::new(1000.0, 1.0, Some(1.0));
        assert_eq!(br.bettable_funds(), 1000.0);
        assert_eq!(br.total_funds(), 1000.0);

        br.deposit(500.0);
        assert_eq!(br.bettable_funds(), 1500.0);
        assert_eq!(br.total_funds(), 1500.0);

        br.withdraw(500.0).unwrap();
        assert_eq!(br.bettable_funds(), 1000.0);
        assert_eq!(br.total_funds(), 1000.0);

        // history: initial + 2 mutations
        assert_eq!(br.history().len(), 3);
    }

    #[test]
    fn test_deposit_saturates_at_ledger_capacity() {
        // A compounding winning streak must pin the ledger at its numeric
        // ceiling, never panic.
        let mut br = BankRoll::with_funds(1000.0);
        for _ in 0..200 {
            br.deposit(br.total_funds() * 0.8);
            assert!(br.total_funds().is_finite());
            assert!(br.total_funds() >= 0.0);
        }

        // Decimal::MAX is ~7.92e28; the ledger is pinned there.
        let ceiling = br.total_funds();
        assert!(ceiling > 7.9e28);
        assert!(ceiling < 8.0e28);

        br.deposit(f64::MAX);
        assert_eq!(br.total_funds(), ceiling);

        // The pinned ledger still services ordinary debits. (At this
        // magnitude an f64 cannot resolve the change, so only the result
        // is asserted.)
        assert!(br.withdraw(1000.0).is_ok());
        assert!(br.total_funds().is_finite());
    }

    #[test]
    fn test_percent_bettable() {
        let mut br = BankRoll::new(1000.0, 0.5, Some(1.0));
        assert_eq!(br.bettable_funds(), 500.0);
        assert_eq!(br.total_funds(), 1000.0);

        br.deposit(500.0);
        assert_eq!(br.bettable_funds(), 750.0);
        assert_eq!(br.total_funds(), 1500.0);
    }

    #[test]
    fn test_two_decimal_rounding() {
        let br = BankRoll::new(100.456, 0.5, None);
        assert_eq!(br.total_funds(), 100.46);
        assert_eq!(br.bettable_funds(), 50.23);
    }

    #[test]
    fn test_withdraw_prevents_negative_bankroll() {
        let mut br = BankRoll::new(100.0, 1.0, None);

        let err = br.withdraw(150.0).unwrap_err();
        assert!(matches!(err, BankrollError::Bankruptcy { .. }));

        // Ledger and history untouched.
        assert_eq!(br.total_funds(), 100.0);
        assert_eq!(br.history().len(), 1);
    }

    #[test]
    fn test_exact_withdrawal_reaches_zero() {
        let mut br = BankRoll::new(100.0, 1.0, None);
        br.withdraw(100.0).unwrap();
        assert_eq!(br.total_funds(), 0.0);

        let err = br.withdraw(1.0).unwrap_err();
        assert!(matches!(err, BankrollError::Bankruptcy { .. }));
    }

    #[test]
    fn test_drawdown_limit_uses_pre_debit_funds() {
        let mut br = BankRoll::new(1000.0, 1.0, Some(0.2));

        // 250 is 25% of 1000, above the 20% limit.
        let err = br.withdraw(250.0).unwrap_err();
        assert!(matches!(err, BankrollError::DrawdownExceeded { .. }));
        assert_eq!(br.total_funds(), 1000.0);

        // 200 is exactly at the limit and passes.
        br.withdraw(200.0).unwrap();
        assert_eq!(br.total_funds(), 800.0);
    }

    #[test]
    fn test_bankruptcy_checked_before_drawdown() {
        let mut br = BankRoll::new(100.0, 1.0, Some(0.5));

        // 150 breaches both rules; bankruptcy wins.
        let err = br.withdraw(150.0).unwrap_err();
        assert!(matches!(err, BankrollError::Bankruptcy { .. }));
        assert_eq!(br.total_funds(), 100.0);
    }

    #[test]
    fn test_bet_respects_bettable_cap() {
        let mut br = BankRoll::new(1000.0, 0.5, None);

        let err = br.bet(600.0).unwrap_err();
        assert!(matches!(err, BankrollError::BetTooLarge { .. }));
        assert_eq!(br.total_funds(), 1000.0);

        br.bet(400.0).unwrap();
        assert_eq!(br.total_funds(), 600.0);
    }

    #[test]
    fn test_add_remove_funds_mirror_deposit_withdraw() {
        let mut br = BankRoll::new(100.0, 1.0, None);
        br.add_funds(50.0);
        assert_eq!(br.total_funds(), 150.0);

        br.remove_funds(50.0).unwrap();
        assert_eq!(br.total_funds(), 100.0);

        let err = br.remove_funds(150.0).unwrap_err();
        assert!(matches!(err, BankrollError::Bankruptcy { .. }));
        assert_eq!(br.total_funds(), 100.0);
    }

    #[test]
    fn test_multiple_small_losses_stop_at_zero() {
        let mut br = BankRoll::new(10.0, 1.0, None);

        br.withdraw(3.0).unwrap();
        br.withdraw(3.0).unwrap();
        br.withdraw(3.0).unwrap();
        assert_eq!(br.total_funds(), 1.0);

        assert!(br.withdraw(2.0).is_err());
        assert_eq!(br.total_funds(), 1.0);

        br.withdraw(1.0).unwrap();
        assert_eq!(br.total_funds(), 0.0);
    }

    #[test]
    fn test_history_tracks_every_mutation() {
        let mut br = BankRoll::new(1000.0, 1.0, None);
        br.deposit(10.0);
        br.withdraw(5.0).unwrap();
        br.bet(100.0).unwrap();

        assert_eq!(br.history(), &[1000.0, 1010.0, 1005.0, 905.0]);
    }

    #[test]
    fn test_percent_bettable_clamped() {
        let br = BankRoll::new(1000.0, 1.5, None);
        assert_eq!(br.bettable_funds(), 1000.0);
    }
}
